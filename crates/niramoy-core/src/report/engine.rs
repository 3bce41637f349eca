//! Range-report aggregation over materialized visits, patients, and slips.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ReportRange;
use crate::models::{Patient, PaymentMethod, PaymentSlip, Visit};

/// Display label for visits whose patient row is missing.
pub const UNKNOWN_PATIENT: &str = "N/A";

/// Optional narrowing filters for a range report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    /// Only keep visits with at least one in-range slip paid by this method
    pub payment_method: Option<PaymentMethod>,
    /// Only keep visits delivered by courier
    pub courier_only: bool,
}

/// Patient identity carried on a report row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRef {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub diary_number: Option<String>,
}

impl From<&Patient> for PatientRef {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            phone: patient.phone.clone(),
            diary_number: patient.diary_number.clone(),
        }
    }
}

/// One visit in a range report, enriched with patient identity and the
/// in-range payment slips that reference it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub visit: Visit,
    /// None when the owning patient row is missing (dangling id)
    pub patient: Option<PatientRef>,
    pub slips: Vec<PaymentSlip>,
    /// Sum of this row's slip amounts
    pub total_amount: f64,
    /// Deduplicated payment methods seen on this row's slips
    pub methods: Vec<PaymentMethod>,
}

impl ReportRow {
    /// Patient name for display; "N/A" when the join failed.
    pub fn patient_name(&self) -> &str {
        self.patient
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PATIENT)
    }
}

/// A generated range report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeReport {
    pub rows: Vec<ReportRow>,
    pub total_visits: usize,
    pub total_revenue: f64,
}

impl RangeReport {
    /// An empty report (zero visits in range is not an error).
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_visits: 0,
            total_revenue: 0.0,
        }
    }
}

/// Build a range report from fully materialized collections.
///
/// Slips are matched to a visit by id AND independently filtered by the
/// report range: a slip sharing a visit id but dated outside the window is
/// excluded from that visit's row. Long-standing behavior, kept on purpose.
///
/// When a payment-method filter is active, visits whose slip set becomes
/// empty under it are dropped; without the filter every in-range visit is
/// kept, slips or not.
pub fn generate_report(
    visits: &[Visit],
    patients: &[Patient],
    slips: &[PaymentSlip],
    range: &ReportRange,
    filters: &ReportFilters,
) -> RangeReport {
    let by_id: HashMap<&str, &Patient> = patients.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut rows: Vec<ReportRow> = Vec::new();

    for visit in visits {
        if !range.contains_day(visit.visit_date) {
            continue;
        }
        if filters.courier_only && visit.delivery != Some(crate::models::DeliveryMethod::Courier) {
            continue;
        }

        let patient = match by_id.get(visit.patient_id.as_str()) {
            Some(p) => Some(PatientRef::from(*p)),
            None => {
                warn!(visit_id = %visit.id, patient_id = %visit.patient_id,
                    "visit references missing patient; reporting as N/A");
                None
            }
        };

        let mut visit_slips: Vec<PaymentSlip> = slips
            .iter()
            .filter(|s| s.visit_id.as_deref() == Some(visit.id.as_str()))
            .filter(|s| range.contains_day(s.date))
            .cloned()
            .collect();

        if let Some(method) = filters.payment_method {
            visit_slips.retain(|s| s.payment_method == Some(method));
            // Under a method filter, only visits actually paid by that
            // method stay in the report.
            if visit_slips.is_empty() {
                continue;
            }
        }

        let total_amount = visit_slips.iter().map(|s| s.amount).sum();

        let mut methods: Vec<PaymentMethod> = Vec::new();
        for slip in &visit_slips {
            if let Some(m) = slip.payment_method {
                if !methods.contains(&m) {
                    methods.push(m);
                }
            }
        }

        rows.push(ReportRow {
            visit: visit.clone(),
            patient,
            slips: visit_slips,
            total_amount,
            methods,
        });
    }

    rows.sort_by(|a, b| {
        a.visit
            .visit_date
            .cmp(&b.visit.visit_date)
            .then_with(|| bengali_name_cmp(a.patient_name(), b.patient_name()))
    });

    let total_revenue = rows.iter().map(|r| r.total_amount).sum();
    let total_visits = rows.len();

    RangeReport {
        rows,
        total_visits,
        total_revenue,
    }
}

/// Compare names by Unicode code point.
///
/// For text within the Bengali block this matches dictionary order closely
/// enough for tie-breaking report rows; full ICU collation is not worth a
/// heavyweight dependency here.
pub fn bengali_name_cmp(a: &str, b: &str) -> Ordering {
    a.chars().cmp(b.chars())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryMethod;
    use crate::report::{resolve_range, ReportType};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(y: i32, m: u32, d: u32) -> ReportRange {
        resolve_range(ReportType::Daily, date(y, m, d), None, None).unwrap()
    }

    fn make_patient(id: &str, name: &str) -> Patient {
        let mut p = Patient::new(name.into(), "01712345678".into());
        p.id = id.into();
        p
    }

    fn make_visit(id: &str, patient_id: &str, day: NaiveDate) -> Visit {
        let mut v = Visit::new(patient_id.into(), day);
        v.id = id.into();
        v
    }

    fn make_slip(
        visit_id: &str,
        day: NaiveDate,
        amount: f64,
        method: Option<PaymentMethod>,
    ) -> PaymentSlip {
        let mut s = PaymentSlip::new("p1".into(), "S-1".into(), day, amount, "ফি".into());
        s.visit_id = Some(visit_id.into());
        s.payment_method = method;
        s
    }

    #[test]
    fn test_single_visit_with_cash_slip() {
        let patients = vec![make_patient("p1", "করিম")];
        let visits = vec![make_visit("v1", "p1", date(2024, 3, 10))];
        let slips = vec![make_slip(
            "v1",
            date(2024, 3, 10),
            500.0,
            Some(PaymentMethod::Cash),
        )];

        let report = generate_report(
            &visits,
            &patients,
            &slips,
            &daily(2024, 3, 10),
            &ReportFilters::default(),
        );

        assert_eq!(report.total_visits, 1);
        assert_eq!(report.total_revenue, 500.0);
        assert_eq!(report.rows[0].total_amount, 500.0);
        assert_eq!(report.rows[0].methods, vec![PaymentMethod::Cash]);
    }

    #[test]
    fn test_method_filter_with_no_match_drops_row() {
        let patients = vec![make_patient("p1", "করিম")];
        let visits = vec![make_visit("v1", "p1", date(2024, 3, 10))];
        let slips = vec![make_slip(
            "v1",
            date(2024, 3, 10),
            500.0,
            Some(PaymentMethod::Cash),
        )];

        let filters = ReportFilters {
            payment_method: Some(PaymentMethod::Bkash),
            courier_only: false,
        };
        let report = generate_report(&visits, &patients, &slips, &daily(2024, 3, 10), &filters);

        assert!(report.rows.is_empty());
        assert_eq!(report.total_visits, 0);
        assert_eq!(report.total_revenue, 0.0);
    }

    #[test]
    fn test_out_of_range_slip_excluded_but_visit_kept() {
        // Slip dated the day after the visit; daily report for the visit day
        // keeps the visit row at zero revenue.
        let patients = vec![make_patient("p1", "করিম")];
        let visits = vec![make_visit("v1", "p1", date(2024, 3, 10))];
        let slips = vec![make_slip(
            "v1",
            date(2024, 3, 11),
            500.0,
            Some(PaymentMethod::Cash),
        )];

        let report = generate_report(
            &visits,
            &patients,
            &slips,
            &daily(2024, 3, 10),
            &ReportFilters::default(),
        );

        assert_eq!(report.total_visits, 1);
        assert_eq!(report.rows[0].total_amount, 0.0);
        assert!(report.rows[0].slips.is_empty());
        assert_eq!(report.total_revenue, 0.0);
    }

    #[test]
    fn test_visit_outside_range_excluded() {
        let patients = vec![make_patient("p1", "করিম")];
        let visits = vec![
            make_visit("v1", "p1", date(2024, 3, 10)),
            make_visit("v2", "p1", date(2024, 3, 12)),
        ];

        let report = generate_report(
            &visits,
            &patients,
            &[],
            &daily(2024, 3, 10),
            &ReportFilters::default(),
        );

        assert_eq!(report.total_visits, 1);
        assert_eq!(report.rows[0].visit.id, "v1");
    }

    #[test]
    fn test_multiple_slips_summed_and_methods_deduped() {
        let patients = vec![make_patient("p1", "করিম")];
        let visits = vec![make_visit("v1", "p1", date(2024, 3, 10))];
        let slips = vec![
            make_slip("v1", date(2024, 3, 10), 300.0, Some(PaymentMethod::Cash)),
            make_slip("v1", date(2024, 3, 10), 200.0, Some(PaymentMethod::Cash)),
            make_slip("v1", date(2024, 3, 10), 150.0, Some(PaymentMethod::Bkash)),
        ];

        let report = generate_report(
            &visits,
            &patients,
            &slips,
            &daily(2024, 3, 10),
            &ReportFilters::default(),
        );

        assert_eq!(report.rows[0].total_amount, 650.0);
        assert_eq!(
            report.rows[0].methods,
            vec![PaymentMethod::Cash, PaymentMethod::Bkash]
        );
        assert_eq!(report.total_revenue, 650.0);
    }

    #[test]
    fn test_unknown_patient_is_na() {
        let visits = vec![make_visit("v1", "ghost", date(2024, 3, 10))];

        let report = generate_report(
            &visits,
            &[],
            &[],
            &daily(2024, 3, 10),
            &ReportFilters::default(),
        );

        assert_eq!(report.total_visits, 1);
        assert!(report.rows[0].patient.is_none());
        assert_eq!(report.rows[0].patient_name(), UNKNOWN_PATIENT);
    }

    #[test]
    fn test_courier_only_filter() {
        let patients = vec![make_patient("p1", "করিম")];
        let mut courier = make_visit("v1", "p1", date(2024, 3, 10));
        courier.delivery = Some(DeliveryMethod::Courier);
        let direct = make_visit("v2", "p1", date(2024, 3, 10));

        let filters = ReportFilters {
            payment_method: None,
            courier_only: true,
        };
        let report = generate_report(
            &[courier, direct],
            &patients,
            &[],
            &daily(2024, 3, 10),
            &filters,
        );

        assert_eq!(report.total_visits, 1);
        assert_eq!(report.rows[0].visit.id, "v1");
    }

    #[test]
    fn test_rows_sorted_by_date_then_name() {
        let patients = vec![make_patient("p1", "করিম"), make_patient("p2", "আলম")];
        let visits = vec![
            make_visit("v1", "p1", date(2024, 3, 12)),
            make_visit("v2", "p2", date(2024, 3, 11)),
            make_visit("v3", "p2", date(2024, 3, 12)),
        ];
        let range = resolve_range(ReportType::Weekly, date(2024, 3, 13), None, None).unwrap();

        let report = generate_report(&visits, &patients, &[], &range, &ReportFilters::default());

        assert_eq!(report.rows[0].visit.id, "v2"); // earliest date
        // Same date: "আলম" sorts before "করিম" in code-point order
        assert_eq!(report.rows[1].visit.id, "v3");
        assert_eq!(report.rows[2].visit.id, "v1");
    }

    #[test]
    fn test_empty_range_is_empty_report() {
        let report = generate_report(
            &[],
            &[],
            &[],
            &daily(2024, 3, 10),
            &ReportFilters::default(),
        );
        assert_eq!(report, RangeReport::empty());
    }

    #[test]
    fn test_bengali_name_cmp() {
        assert_eq!(bengali_name_cmp("অমল", "কমল"), Ordering::Less);
        assert_eq!(bengali_name_cmp("করিম", "করিম"), Ordering::Equal);
    }
}
