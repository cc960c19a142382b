//! Treatment recommendation.
//!
//! A fixed two-branch rule keyed on viral load. The rule is illustrative and not
//! clinical guidance.

use crate::constants::{EXTRA_PI_NOT_APPLIED, EXTRA_PK_EN_LABEL, VIRAL_LOAD_THRESHOLD};
use chart_types::ViralLoad;
use serde::{Deserialize, Serialize};

/// Structured treatment recommendation.
///
/// `extra_pi` and `extra_pk_en` are informational and drive no further logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub base_drug_combo: String,
    pub complementary_ini: String,
    pub complementary_nnrti: String,
    pub extra_pi: String,
    pub extra_pk_en: bool,
}

impl TreatmentPlan {
    fn new(base: &str, ini: &str, nnrti: &str, extra_pi: &str, extra_pk_en: bool) -> Self {
        Self {
            base_drug_combo: base.to_string(),
            complementary_ini: ini.to_string(),
            complementary_nnrti: nnrti.to_string(),
            extra_pi: extra_pi.to_string(),
            extra_pk_en,
        }
    }

    /// Flattened one-line form, stored as the `treatment_used` of a record.
    ///
    /// An extra PI of "Not Applied" is left out, and the pk-enhancer label is appended
    /// when the flag is set, e.g. `"FTC+TAF, DTG, RPV, ATV, extra pk-En"`.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            self.base_drug_combo.as_str(),
            self.complementary_ini.as_str(),
            self.complementary_nnrti.as_str(),
        ];
        if self.extra_pi != EXTRA_PI_NOT_APPLIED {
            parts.push(self.extra_pi.as_str());
        }
        if self.extra_pk_en {
            parts.push(EXTRA_PK_EN_LABEL);
        }
        parts.join(", ")
    }

    /// Labelled lines shown to the clinician after a record is added.
    pub fn display_lines(&self) -> [String; 5] {
        [
            format!("Base Drug Combo: {}", self.base_drug_combo),
            format!("Complementary INI: {}", self.complementary_ini),
            format!("Complementary NNRTI: {}", self.complementary_nnrti),
            format!("Extra PI: {}", self.extra_pi),
            format!(
                "Extra pk-En: {}",
                if self.extra_pk_en { "True" } else { "False" }
            ),
        ]
    }
}

/// Maps a viral load to its treatment plan.
///
/// The comparison is strict: exactly 7000 takes the low-load branch.
pub fn recommend(viral_load: ViralLoad) -> TreatmentPlan {
    if viral_load.value() > VIRAL_LOAD_THRESHOLD {
        TreatmentPlan::new("FTC+TDF", "DTG", "EFV", EXTRA_PI_NOT_APPLIED, true)
    } else {
        TreatmentPlan::new("FTC+TAF", "DTG", "RPV", "ATV", true)
    }
}
