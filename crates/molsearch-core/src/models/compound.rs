//! Records exchanged with the remote compound registry.
//!
//! The registry answers in snake_case (`reg_number`, `smiles`); some
//! endpoints use camelCase or call the structure field `structure`. Aliases
//! accept both spellings.

use serde::{Deserialize, Serialize};

/// Row of the compound listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundSummary {
    pub id: i64,
    #[serde(alias = "regNumber", alias = "reg_number")]
    pub name: String,
    #[serde(alias = "structure")]
    pub smiles: String,
}

/// A compound returned by the substructure and identifier search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundHit {
    #[serde(alias = "regNumber")]
    pub reg_number: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(alias = "structure")]
    pub smiles: String,
}

/// Variant listed on a compound detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSummary {
    #[serde(default, alias = "varNumber")]
    pub var_number: Option<String>,
    #[serde(alias = "fullVariant")]
    pub full_variant: String,
}

/// Full compound record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundDetail {
    #[serde(alias = "regNumber")]
    pub reg_number: String,
    #[serde(alias = "smiles")]
    pub structure: String,
    #[serde(default, alias = "iupacName")]
    pub iupac_name: Option<String>,
    #[serde(default, alias = "baseFormula")]
    pub base_formula: Option<String>,
    #[serde(default, alias = "baseFormulaWeight")]
    pub base_formula_weight: Option<f64>,
    #[serde(default)]
    pub variants: Vec<VariantSummary>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Full variant record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDetail {
    #[serde(alias = "varNumber")]
    pub var_number: String,
    #[serde(default, alias = "regNumber")]
    pub reg_number: Option<String>,
    #[serde(default, alias = "fullVariant")]
    pub full_variant: Option<String>,
    #[serde(default, alias = "smiles")]
    pub structure: Option<String>,
    #[serde(default, alias = "formulaWeight")]
    pub formula_weight: Option<f64>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Identifier search fields; any non-empty subset may be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierQuery {
    /// Registration number.
    #[serde(default)]
    pub reg_number: Option<String>,
    #[serde(default)]
    pub synonym: Option<String>,
    /// CAS registry number.
    #[serde(default)]
    pub cas: Option<String>,
}

impl IdentifierQuery {
    pub fn reg_number(value: impl Into<String>) -> Self {
        Self {
            reg_number: Some(value.into()),
            ..Self::default()
        }
    }

    /// Non-blank fields as `(query parameter, trimmed value)` pairs, in a fixed order.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        [
            ("regn", self.reg_number.as_deref()),
            ("syn", self.synonym.as_deref()),
            ("cas", self.cas.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value?.trim();
            (!value.is_empty()).then_some((key, value))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_accepts_both_spellings() {
        let snake: CompoundHit =
            serde_json::from_str(r#"{"reg_number":"R1","variant":null,"smiles":"CCO"}"#)
                .unwrap();
        let camel: CompoundHit =
            serde_json::from_str(r#"{"regNumber":"R1","structure":"CCO"}"#).unwrap();
        assert_eq!(snake, camel);
    }

    #[test]
    fn test_detail_optional_fields() {
        let detail: CompoundDetail = serde_json::from_str(
            r#"{
                "reg_number": "R-7",
                "structure": "c1ccccc1",
                "base_formula_weight": 78.1118,
                "variants": [{"full_variant": "R-7-001"}],
                "synonyms": ["benzene"]
            }"#,
        )
        .unwrap();
        assert_eq!(detail.variants.len(), 1);
        assert_eq!(detail.synonyms, vec!["benzene"]);
        assert!(detail.iupac_name.is_none());
    }

    #[test]
    fn test_identifier_params_skip_blank_fields() {
        let query = IdentifierQuery {
            reg_number: Some("  ".into()),
            synonym: Some(" aspirin ".into()),
            cas: Some("50-78-2".into()),
        };
        assert_eq!(query.params(), vec![("syn", "aspirin"), ("cas", "50-78-2")]);
        assert!(!query.is_empty());
        assert!(IdentifierQuery::default().is_empty());
    }
}
