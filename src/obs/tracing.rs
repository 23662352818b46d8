// self
use crate::{
	_prelude::*,
	obs::{self, OpKind, OpOutcome},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Span for one session or fetch operation.
///
/// The span carries an `outcome` field that starts empty and is filled by
/// [`OpSpan::record`], so the closing span event states how the operation ended. Every
/// recorded outcome is also forwarded to the metrics counter.
#[derive(Clone, Debug)]
pub struct OpSpan {
	kind: OpKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a span for `kind` at call site `stage` and counts the attempt.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		let this = Self {
			kind,
			span: tracing::info_span!(
				"storefront_session.op",
				op = kind.as_str(),
				stage,
				outcome = tracing::field::Empty,
			),
		};
		#[cfg(not(feature = "tracing"))]
		let this = {
			let _ = stage;

			Self { kind }
		};

		obs::record_op_outcome(kind, OpOutcome::Attempt);

		this
	}

	/// Operation this span belongs to.
	pub fn kind(&self) -> OpKind {
		self.kind
	}

	/// Stamps `outcome` onto the span and counts it.
	pub fn record(&self, outcome: OpOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());

		obs::record_op_outcome(self.kind, outcome);
	}

	/// Records the outcome of a finished store operation; `OperationInProgress` is a drop.
	pub(crate) fn record_result<T>(&self, result: &Result<T>) {
		self.record(match result {
			Ok(_) => OpOutcome::Success,
			Err(Error::OperationInProgress { .. }) => OpOutcome::Dropped,
			Err(_) => OpOutcome::Failure,
		});
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
