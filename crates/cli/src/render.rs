//! Plain-text rendering of patient tables, charts and recommendations.

use chart_core::{ClinicalRecord, Patient, PatientSummary, TreatmentPlan};

/// Renders a left-aligned table with a header rule.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

pub fn patient_table(patients: &[PatientSummary]) -> String {
    let rows: Vec<Vec<String>> = patients
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.age.to_string(),
                p.gender.clone(),
                p.ethnicity.clone(),
                p.condition.clone(),
            ]
        })
        .collect();
    table(
        &["id", "name", "age", "gender", "ethnicity", "condition"],
        &rows,
    )
}

pub fn records_table(records: &[ClinicalRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.viral_load.to_string(),
                r.cd4_count.to_string(),
                r.treatment_used.clone(),
            ]
        })
        .collect();
    table(&["Viral Load", "CD4 Count", "Treatment Used"], &rows)
}

/// The patient chart page body: title, demographics, and records.
pub fn chart(patient: &Patient) -> String {
    let mut out = format!(
        "{}\nAge: {}, Gender: {}, Ethnicity: {}\nCondition: {}\n\n",
        patient.name, patient.age, patient.gender, patient.ethnicity, patient.condition
    );
    if patient.records.is_empty() {
        out.push_str("No records available.\n");
    } else {
        out.push_str(&records_table(&patient.records));
    }
    out
}

pub fn recommendation(plan: &TreatmentPlan) -> String {
    let mut out = String::from("### Treatment Recommendations\n");
    for line in plan.display_lines() {
        out.push_str("- ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
