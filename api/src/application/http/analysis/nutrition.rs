//! Typed view over the JSON object returned by the model.
//!
//! The model is asked for a fixed shape but does not always honour it: numbers arrive as
//! strings with units, lists arrive as `null`, profile ratings arrive as arrays, sections
//! arrive as bare strings. Every field here deserializes leniently: a field of the wrong type
//! is dropped, never the whole analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NutritionalAnalysis {
    #[serde(deserialize_with = "lenient_object")]
    pub product: Option<ProductInfo>,
    #[serde(deserialize_with = "lenient_object")]
    pub per_serving: Option<PerServing>,
    #[serde(deserialize_with = "lenient_list")]
    pub ingredients: Vec<String>,
    #[serde(deserialize_with = "lenient_object")]
    pub identified_additives: Option<IdentifiedAdditives>,
    #[serde(deserialize_with = "lenient_object")]
    pub classification: Option<Classification>,
    #[serde(deserialize_with = "lenient_object")]
    pub general_rating: Option<Rating>,
    #[serde(deserialize_with = "lenient_ratings")]
    pub profile_ratings: BTreeMap<String, Rating>,
    #[serde(deserialize_with = "lenient_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub warnings: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub executive_summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProductInfo {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub brand: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub serving_size: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub servings_per_container: Option<f64>,
}

/// Values per serving. Units follow the label: kcal for calories, mg for sodium, g otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PerServing {
    #[serde(deserialize_with = "lenient_number")]
    pub calories: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_fat: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub saturated_fat: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub trans_fat: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_carbohydrates: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub fiber: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_sugars: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub added_sugars: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub protein: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub sodium: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct IdentifiedAdditives {
    #[serde(deserialize_with = "lenient_list")]
    pub sweeteners: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub colorants: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub preservatives: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub flavorings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Classification {
    #[serde(deserialize_with = "lenient_number")]
    pub processing_level: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub food_category: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub risk_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Rating {
    #[serde(deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub justification: Option<String>,
}

impl NutritionalAnalysis {
    /// Never fails: anything that is not an object reads as an empty analysis, and a
    /// legacy `summary` key fills in a missing `executive_summary`.
    pub fn from_payload(payload: &Value) -> Self {
        let Value::Object(fields) = payload else {
            return Self::default();
        };

        let mut fields = fields.clone();
        if fields.get("executive_summary").and_then(text_from).is_none() {
            if let Some(summary) = fields.remove("summary") {
                fields.insert("executive_summary".to_string(), summary);
            }
        }

        serde_json::from_value(Value::Object(fields)).unwrap_or_default()
    }
}

/// Reads the leading number of values like `12`, `"12.5 g"`, `"1,5"` or `"1,200 mg"`.
fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let numeric: String = text
                .trim()
                .trim_start_matches(['<', '>', '~'])
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
                .collect();
            without_separators(&numeric).parse().ok()
        }
        _ => None,
    }
}

/// `1,200` and `12,345.5` use commas to group thousands; `1,5` and `0,125` use a decimal comma.
fn without_separators(numeric: &str) -> String {
    let mut groups = numeric.split(',');
    let head = groups.next().unwrap_or_default();
    let tail: Vec<&str> = groups.collect();

    let grouped = !tail.is_empty()
        && !head.is_empty()
        && !head.starts_with('0')
        && !head.contains('.')
        && tail.iter().enumerate().all(|(i, group)| {
            let digits = group.split('.').next().unwrap_or_default();
            digits.len() == 3 && (i + 1 == tail.len() || !group.contains('.'))
        });

    if grouped {
        numeric.replace(',', "")
    } else {
        numeric.replacen(',', ".", 1)
    }
}

fn text_from(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from(&value))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(fields) => fields.get("name").and_then(text_from),
                other => text_from(other),
            })
            .collect(),
        other => text_from(&other).into_iter().collect(),
    };
    Ok(items)
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_ratings<'de, D>(deserializer: D) -> Result<BTreeMap<String, Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let rating = |value: &Value| serde_json::from_value::<Rating>(value.clone()).ok();

    let ratings = match value {
        Value::Object(entries) => entries
            .iter()
            .filter_map(|(profile, entry)| Some((profile.clone(), rating(entry)?)))
            .collect(),
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| {
                let profile = entry
                    .get("profile")
                    .or_else(|| entry.get("name"))
                    .and_then(text_from)?;
                Some((profile, rating(entry)?))
            })
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(ratings)
}
