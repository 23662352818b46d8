//! Licensing summary returned by the backend.

// self
use crate::_prelude::*;

/// Seat allocation reported by `GET /api/licenses`.
///
/// `total` is whatever the backend reports; it is not derived from `types` and the two may
/// disagree. A body without `types` decodes to an empty breakdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSummary {
	/// Total allocated licenses.
	pub total: u64,
	/// Count per license type name, ordered by name.
	#[serde(default)]
	pub types: BTreeMap<String, u64>,
}
impl LicenseSummary {
	/// Creates a summary from a total and a per-type breakdown.
	pub fn new<I, S>(total: u64, types: I) -> Self
	where
		I: IntoIterator<Item = (S, u64)>,
		S: Into<String>,
	{
		Self { total, types: types.into_iter().map(|(name, count)| (name.into(), count)).collect() }
	}

	/// Count for a single license type, if the backend reported it.
	pub fn type_count(&self, name: &str) -> Option<u64> {
		self.types.get(name).copied()
	}

	/// Sum of the per-type counts, saturating on overflow.
	pub fn types_sum(&self) -> u64 {
		self.types.values().fold(0_u64, |acc, count| acc.saturating_add(*count))
	}

	/// Iterates `(type, count)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.types.iter().map(|(name, count)| (name.as_str(), *count))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decodes_backend_payload() {
		let summary: LicenseSummary = serde_json::from_str(
			r#"{"total":125,"types":{"Azure AD Premium P1":45,"Azure AD Premium P2":60,"Microsoft 365 E3":20}}"#,
		)
		.expect("Backend payload should decode.");

		assert_eq!(summary.total, 125);
		assert_eq!(summary.type_count("Microsoft 365 E3"), Some(20));
		assert_eq!(summary.type_count("Microsoft 365 E5"), None);
		assert_eq!(
			summary.iter().map(|(name, _)| name).collect::<Vec<_>>(),
			["Azure AD Premium P1", "Azure AD Premium P2", "Microsoft 365 E3"]
		);
	}

	#[test]
	fn total_is_not_tied_to_the_breakdown() {
		let summary: LicenseSummary =
			serde_json::from_str(r#"{"total":5,"types":{"E3":1}}"#).expect("Payload should decode.");

		assert_eq!(summary.total, 5);
		assert_eq!(summary.types_sum(), 1);

		let summary: LicenseSummary =
			serde_json::from_str(r#"{"total":0}"#).expect("Missing types should decode.");

		assert!(summary.types.is_empty());
	}

	#[test]
	fn rejects_negative_and_missing_totals() {
		assert!(serde_json::from_str::<LicenseSummary>(r#"{"total":-1,"types":{}}"#).is_err());
		assert!(serde_json::from_str::<LicenseSummary>(r#"{"types":{"E3":1}}"#).is_err());
		assert!(serde_json::from_str::<LicenseSummary>(r#"{"total":1,"types":{"E3":-2}}"#).is_err());
		assert!(serde_json::from_str::<LicenseSummary>(r#"{"total":1,"types":[]}"#).is_err());
	}

	#[test]
	fn types_sum_saturates() {
		let summary = LicenseSummary::new(1, [("a", u64::MAX), ("b", 1)]);

		assert_eq!(summary.types_sum(), u64::MAX);
	}
}
