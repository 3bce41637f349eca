//! End-to-end report tests over a real database.
//!
//! These exercise the full path: forms in through [`Clinic`], rows out
//! through the range-report engine.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use proptest::prelude::*;

use niramoy_core::report::{resolve_range, resolve_range_str};
use niramoy_core::{
    Clinic, DeliveryMethod, Patient, PaymentMethod, ReportFilters, ReportType, SlipRequest,
    VisitDetails,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clinic() -> Clinic {
    Clinic::open_in_memory().unwrap()
}

fn register(clinic: &Clinic, name: &str, phone: &str) -> Patient {
    clinic
        .register_patient(name, phone, Default::default())
        .unwrap()
}

fn pay(
    clinic: &Clinic,
    patient_id: &str,
    visit_id: Option<&str>,
    day: NaiveDate,
    amount: f64,
    method: PaymentMethod,
) {
    clinic
        .issue_slip(SlipRequest {
            patient_id: patient_id.to_string(),
            visit_id: visit_id.map(Into::into),
            date: day,
            amount,
            purpose: "ভিজিট ফি".into(),
            payment_method: Some(method),
            received_by: None,
            slip_number: None,
        })
        .unwrap();
}

#[test]
fn test_daily_report_end_to_end() {
    let clinic = clinic();
    let day = date(2024, 3, 10);

    let patient = register(&clinic, "করিম মিয়া", "01712345678");
    let visit = clinic
        .add_visit(&patient.id, day, VisitDetails::default())
        .unwrap();
    pay(&clinic, &patient.id, Some(&visit.id), day, 500.0, PaymentMethod::Cash);
    // Same-day slip with no visit link; stays out of every row
    pay(&clinic, &patient.id, None, day, 200.0, PaymentMethod::Bkash);

    let report = clinic
        .range_report(ReportType::Daily, day, None, None, &ReportFilters::default())
        .unwrap()
        .unwrap();

    assert_eq!(report.total_visits, 1);
    assert_eq!(report.rows[0].patient_name(), "করিম মিয়া");
    assert_eq!(report.rows[0].total_amount, 500.0);
    assert_eq!(report.total_revenue, 500.0);
}

#[test]
fn test_weekly_report_window_is_sunday_to_saturday() {
    let clinic = clinic();
    let patient = register(&clinic, "করিম", "01712345678");

    // Week of Wednesday 2024-03-13: Sunday 03-10 through Saturday 03-16
    for day in [date(2024, 3, 10), date(2024, 3, 16), date(2024, 3, 17)] {
        clinic
            .add_visit(&patient.id, day, VisitDetails::default())
            .unwrap();
    }

    let report = clinic
        .range_report(
            ReportType::Weekly,
            date(2024, 3, 13),
            None,
            None,
            &ReportFilters::default(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(report.total_visits, 2);
    assert!(report
        .rows
        .iter()
        .all(|r| r.visit.visit_date <= date(2024, 3, 16)));
}

#[test]
fn test_monthly_report_spans_whole_month() {
    let clinic = clinic();
    let patient = register(&clinic, "করিম", "01712345678");

    clinic
        .add_visit(&patient.id, date(2024, 2, 1), VisitDetails::default())
        .unwrap();
    clinic
        .add_visit(&patient.id, date(2024, 2, 29), VisitDetails::default())
        .unwrap();
    clinic
        .add_visit(&patient.id, date(2024, 3, 1), VisitDetails::default())
        .unwrap();

    let report = clinic
        .range_report(
            ReportType::Monthly,
            date(2024, 2, 14),
            None,
            None,
            &ReportFilters::default(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(report.total_visits, 2);
}

#[test]
fn test_payment_method_filter_drops_unpaid_rows() {
    let clinic = clinic();
    let day = date(2024, 3, 10);
    let p1 = register(&clinic, "করিম", "01712345671");
    let p2 = register(&clinic, "আলম", "01712345672");

    let v1 = clinic.add_visit(&p1.id, day, VisitDetails::default()).unwrap();
    let v2 = clinic.add_visit(&p2.id, day, VisitDetails::default()).unwrap();
    pay(&clinic, &p1.id, Some(&v1.id), day, 500.0, PaymentMethod::Cash);
    pay(&clinic, &p2.id, Some(&v2.id), day, 300.0, PaymentMethod::Bkash);

    let filters = ReportFilters {
        payment_method: Some(PaymentMethod::Bkash),
        courier_only: false,
    };
    let report = clinic
        .range_report(ReportType::Daily, day, None, None, &filters)
        .unwrap()
        .unwrap();

    assert_eq!(report.total_visits, 1);
    assert_eq!(report.rows[0].visit.id, v2.id);
    assert_eq!(report.total_revenue, 300.0);
}

#[test]
fn test_courier_filter_end_to_end() {
    let clinic = clinic();
    let day = date(2024, 3, 10);
    let patient = register(&clinic, "করিম", "01712345678");

    clinic
        .add_visit(
            &patient.id,
            day,
            VisitDetails {
                delivery: Some(DeliveryMethod::Courier),
                ..Default::default()
            },
        )
        .unwrap();
    clinic
        .add_visit(
            &patient.id,
            day,
            VisitDetails {
                delivery: Some(DeliveryMethod::Direct),
                ..Default::default()
            },
        )
        .unwrap();

    let filters = ReportFilters {
        payment_method: None,
        courier_only: true,
    };
    let report = clinic
        .range_report(ReportType::Daily, day, None, None, &filters)
        .unwrap()
        .unwrap();

    assert_eq!(report.total_visits, 1);
    assert_eq!(
        report.rows[0].visit.delivery,
        Some(DeliveryMethod::Courier)
    );
}

#[test]
fn test_slip_outside_window_not_counted() {
    let clinic = clinic();
    let patient = register(&clinic, "করিম", "01712345678");
    let visit = clinic
        .add_visit(&patient.id, date(2024, 3, 10), VisitDetails::default())
        .unwrap();
    // Courier balance settled the next day
    pay(
        &clinic,
        &patient.id,
        Some(&visit.id),
        date(2024, 3, 11),
        500.0,
        PaymentMethod::Cash,
    );

    let report = clinic
        .range_report(
            ReportType::Daily,
            date(2024, 3, 10),
            None,
            None,
            &ReportFilters::default(),
        )
        .unwrap()
        .unwrap();

    assert_eq!(report.total_visits, 1);
    assert_eq!(report.rows[0].total_amount, 0.0);
    assert_eq!(report.total_revenue, 0.0);
}

#[test]
fn test_custom_range_incomplete_or_inverted_is_none() {
    let clinic = clinic();
    let reference = date(2024, 3, 13);

    let missing = clinic
        .range_report(ReportType::Custom, reference, None, None, &ReportFilters::default())
        .unwrap();
    assert!(missing.is_none());

    let inverted = clinic
        .range_report(
            ReportType::Custom,
            reference,
            Some(date(2024, 3, 20)),
            Some(date(2024, 3, 5)),
            &ReportFilters::default(),
        )
        .unwrap();
    assert!(inverted.is_none());
}

#[test]
fn test_empty_range_is_ok_not_error() {
    let clinic = clinic();
    let report = clinic
        .range_report(
            ReportType::Daily,
            date(2024, 3, 10),
            None,
            None,
            &ReportFilters::default(),
        )
        .unwrap()
        .unwrap();
    assert_eq!(report.total_visits, 0);
    assert_eq!(report.total_revenue, 0.0);
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..13, 1u32..29)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn prop_weekly_window_is_seven_days_from_sunday(reference in arb_date()) {
        let range = resolve_range(ReportType::Weekly, reference, None, None).unwrap();
        prop_assert_eq!(range.start_day().weekday(), Weekday::Sun);
        prop_assert_eq!(range.end_day().weekday(), Weekday::Sat);
        prop_assert_eq!(range.end_day() - range.start_day(), Duration::days(6));
        prop_assert!(range.contains_day(reference));
    }

    #[test]
    fn prop_daily_window_contains_only_its_day(reference in arb_date()) {
        let range = resolve_range(ReportType::Daily, reference, None, None).unwrap();
        prop_assert!(range.contains_day(reference));
        prop_assert!(!range.contains_day(reference - Duration::days(1)));
        prop_assert!(!range.contains_day(reference + Duration::days(1)));
    }

    #[test]
    fn prop_monthly_window_covers_reference_month(reference in arb_date()) {
        let range = resolve_range(ReportType::Monthly, reference, None, None).unwrap();
        prop_assert_eq!(range.start_day().day(), 1);
        prop_assert_eq!(range.start_day().month(), reference.month());
        prop_assert_eq!(range.end_day().month(), reference.month());
        prop_assert!((range.end_day() + Duration::days(1)).day() == 1);
    }

    #[test]
    fn prop_custom_inverted_bounds_never_resolve(a in arb_date(), b in arb_date()) {
        let resolved = resolve_range(ReportType::Custom, a, Some(a), Some(b));
        if a > b {
            prop_assert!(resolved.is_none());
        } else {
            let range = resolved.unwrap();
            prop_assert_eq!(range.start_day(), a);
            prop_assert_eq!(range.end_day(), b);
        }
    }

    #[test]
    fn prop_malformed_form_input_never_panics(s in "\\PC*") {
        let _ = resolve_range_str("custom", &s, Some(&s), Some(&s));
        let _ = resolve_range_str(&s, "2024-03-10", None, None);
    }
}
