//! Printable medicine-instruction sheets.
//!
//! Deterministic Bengali template over the prescription's items; no text
//! generation involved.

use niramoy_core::{ClinicSettings, Prescription};

/// Standing instructions printed at the foot of every sheet.
pub const GENERAL_ADVICE: &str =
    "ওষুধ খাওয়ার আধা ঘণ্টা আগে ও পরে কিছু খাবেন না। কড়া গন্ধযুক্ত খাবার (পেঁয়াজ, রসুন, কফি) এড়িয়ে চলুন। ওষুধ ঠান্ডা ও শুকনো জায়গায় রাখুন।";

/// Render the instruction sheet for a prescription.
///
/// Lines follow the item order on the prescription; the clinic header and
/// general advice frame them.
pub fn medicine_instructions(prescription: &Prescription, settings: &ClinicSettings) -> String {
    let mut sheet = String::new();

    sheet.push_str(&settings.clinic_name);
    sheet.push('\n');
    if !prescription.doctor_name.is_empty() {
        sheet.push_str(&prescription.doctor_name);
        sheet.push('\n');
    }
    sheet.push_str(&format!("তারিখ: {}\n\n", prescription.date.format("%d-%m-%Y")));

    sheet.push_str("ওষুধ সেবনের নিয়ম:\n");
    for (index, item) in prescription.items.iter().enumerate() {
        sheet.push_str(&format!(
            "{}. {} — {}, {}, {}\n",
            index + 1,
            item.medicine_name,
            item.dosage,
            item.frequency,
            item.duration
        ));
        if let Some(notes) = &item.notes {
            sheet.push_str(&format!("   ({notes})\n"));
        }
    }

    if let Some(days) = prescription.follow_up_days {
        sheet.push_str(&format!("\n{days} দিন পর পুনরায় দেখা করুন।\n"));
    }
    if let Some(advice) = &prescription.advice {
        sheet.push('\n');
        sheet.push_str(advice);
        sheet.push('\n');
    }

    sheet.push('\n');
    sheet.push_str(GENERAL_ADVICE);
    sheet.push('\n');
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use niramoy_core::{PrescriptionItem, PrescriptionType};

    fn sample() -> Prescription {
        let mut rx = Prescription::new(
            "patient-1".into(),
            "visit-1".into(),
            PrescriptionType::Adult,
            "ডাঃ রহমান".into(),
        );
        rx.items = vec![PrescriptionItem {
            medicine_name: "Belladonna".into(),
            dosage: "৩০ শক্তি".into(),
            frequency: "দিনে ৩ বার".into(),
            duration: "৭ দিন".into(),
            notes: Some("খাবারের আগে".into()),
        }];
        rx.follow_up_days = Some(7);
        rx
    }

    #[test]
    fn test_sheet_lists_items_in_order() {
        let sheet = medicine_instructions(&sample(), &ClinicSettings::default());
        assert!(sheet.contains("নিরাময় হোমিও হল"));
        assert!(sheet.contains("1. Belladonna — ৩০ শক্তি, দিনে ৩ বার, ৭ দিন"));
        assert!(sheet.contains("খাবারের আগে"));
        assert!(sheet.contains("৭ দিন পর পুনরায় দেখা করুন"));
        assert!(sheet.contains(GENERAL_ADVICE));
    }

    #[test]
    fn test_sheet_is_deterministic() {
        let rx = sample();
        let settings = ClinicSettings::default();
        assert_eq!(
            medicine_instructions(&rx, &settings),
            medicine_instructions(&rx, &settings)
        );
    }
}
