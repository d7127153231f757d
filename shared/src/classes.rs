use strum_macros::{Display, IntoStaticStr};

/// The classifier's label set, with an explicit arm for labels it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum TumorClass {
    Glioma,
    Meningioma,
    Pituitary,
    #[strum(serialize = "No Tumor")]
    NoTumor,
    Unknown,
}

/// Order of the classifier's output vector.
pub const MODEL_OUTPUT_ORDER: [TumorClass; 4] = [
    TumorClass::Glioma,
    TumorClass::Meningioma,
    TumorClass::NoTumor,
    TumorClass::Pituitary,
];

impl TumorClass {
    /// Exact, case-sensitive lookup. Anything else maps to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Glioma" => TumorClass::Glioma,
            "Meningioma" => TumorClass::Meningioma,
            "Pituitary" => TumorClass::Pituitary,
            "No Tumor" => TumorClass::NoTumor,
            _ => TumorClass::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        self.into()
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TumorClass::Glioma => "fa-solid fa-brain",
            TumorClass::Meningioma => "fa-solid fa-circle-nodes",
            TumorClass::Pituitary => "fa-solid fa-dna",
            TumorClass::NoTumor => "fa-solid fa-circle-check",
            TumorClass::Unknown => "fa-solid fa-circle-question",
        }
    }

    pub fn style_class(&self) -> &'static str {
        match self {
            TumorClass::Glioma => "glioma",
            TumorClass::Meningioma => "meningioma",
            TumorClass::Pituitary => "pituitary",
            TumorClass::NoTumor => "no-tumor",
            TumorClass::Unknown => "unknown-class",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TumorClass::Glioma => {
                "A tumor arising from glial cells in the brain or spinal cord."
            }
            TumorClass::Meningioma => {
                "A usually slow-growing tumor forming in the meninges around the brain."
            }
            TumorClass::Pituitary => "An abnormal growth in the pituitary gland.",
            TumorClass::NoTumor => "No tumor was detected in this scan.",
            TumorClass::Unknown => "This label is not one the application recognizes.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_round_trip_through_display() {
        for class in MODEL_OUTPUT_ORDER {
            assert_eq!(TumorClass::from_label(&class.to_string()), class);
        }
        assert_eq!(TumorClass::NoTumor.to_string(), "No Tumor");
        assert_eq!(TumorClass::NoTumor.label(), "No Tumor");
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(TumorClass::from_label("glioma"), TumorClass::Unknown);
        assert_eq!(TumorClass::from_label("NoTumor"), TumorClass::Unknown);
        assert_eq!(TumorClass::from_label(" Glioma"), TumorClass::Unknown);
        assert_eq!(TumorClass::from_label("Unknown"), TumorClass::Unknown);
    }

    #[test]
    fn test_unknown_label_gets_fallback_presentation() {
        let class = TumorClass::from_label("Astrocytoma");
        assert_eq!(class.icon(), "fa-solid fa-circle-question");
        assert_eq!(class.style_class(), "unknown-class");
    }
}
