use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::constants::EXTERNAL_PAGE_SIZE;

const OFF_SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";
const USDA_SEARCH_URL: &str = "https://api.nal.usda.gov/fdc/v1/foods/search";

/// Product shape shared by both external APIs, nutrition per 100 g
///
/// Serialized both into API responses and into the search cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProduct {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub source: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
}

/// Client for the third-party nutrition APIs
///
/// OpenFoodFacts needs no credentials and is tried first; USDA FoodData
/// Central is tried when a key is configured and OpenFoodFacts yields
/// nothing.
#[derive(Clone)]
pub struct NutritionApi {
    http: Client,
    usda_api_key: Option<String>,
}

impl NutritionApi {
    pub fn new(usda_api_key: Option<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { http, usda_api_key }
    }

    /// Search both external APIs, first non-empty result set wins
    pub async fn search(&self, query: &str) -> Result<Vec<ExternalProduct>, reqwest::Error> {
        match self.search_openfoodfacts(query).await {
            Ok(products) if !products.is_empty() => return Ok(products),
            Ok(_) => {
                tracing::debug!("OpenFoodFacts returned no results for '{}'", query);
            }
            Err(e) => {
                tracing::warn!("OpenFoodFacts search failed for '{}': {}", query, e);
            }
        }

        if self.usda_api_key.is_some() {
            return self.search_usda(query).await;
        }

        Ok(Vec::new())
    }

    async fn search_openfoodfacts(
        &self,
        query: &str,
    ) -> Result<Vec<ExternalProduct>, reqwest::Error> {
        let response: OffSearchResponse = self
            .http
            .get(OFF_SEARCH_URL)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", &EXTERNAL_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .products
            .into_iter()
            .filter_map(map_off_product)
            .collect())
    }

    async fn search_usda(&self, query: &str) -> Result<Vec<ExternalProduct>, reqwest::Error> {
        let api_key = self.usda_api_key.as_deref().unwrap_or_default();

        let response: UsdaSearchResponse = self
            .http
            .get(USDA_SEARCH_URL)
            .query(&[
                ("api_key", api_key),
                ("query", query),
                ("pageSize", &EXTERNAL_PAGE_SIZE.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.foods.into_iter().map(map_usda_food).collect())
    }
}

// =============================================================================
// OpenFoodFacts response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct OffSearchResponse {
    #[serde(default)]
    products: Vec<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    product_name: Option<String>,
    brands: Option<String>,
    code: Option<String>,
    /// Left as raw JSON: OpenFoodFacts mixes numbers and strings here
    #[serde(default)]
    nutriments: Value,
}

fn off_nutriment(nutriments: &Value, key: &str) -> f64 {
    let value = &nutriments[key];
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0.0)
}

fn map_off_product(product: OffProduct) -> Option<ExternalProduct> {
    let name = product.product_name.filter(|n| !n.trim().is_empty())?;
    let n = &product.nutriments;

    Some(ExternalProduct {
        name,
        brand: product.brands.filter(|b| !b.trim().is_empty()),
        barcode: product.code,
        source: "openfoodfacts".to_string(),
        calories: off_nutriment(n, "energy-kcal_100g"),
        protein_g: off_nutriment(n, "proteins_100g"),
        carbs_g: off_nutriment(n, "carbohydrates_100g"),
        fat_g: off_nutriment(n, "fat_100g"),
        fiber_g: off_nutriment(n, "fiber_100g"),
        sugar_g: off_nutriment(n, "sugars_100g"),
        // OpenFoodFacts reports sodium in grams
        sodium_mg: off_nutriment(n, "sodium_100g") * 1000.0,
    })
}

// =============================================================================
// USDA FoodData Central response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaSearchResponse {
    #[serde(default)]
    foods: Vec<UsdaFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaFood {
    description: String,
    brand_owner: Option<String>,
    gtin_upc: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<UsdaNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaNutrient {
    nutrient_name: Option<String>,
    value: Option<f64>,
}

fn usda_nutrient(nutrients: &[UsdaNutrient], name: &str) -> f64 {
    nutrients
        .iter()
        .find(|n| n.nutrient_name.as_deref() == Some(name))
        .and_then(|n| n.value)
        .unwrap_or(0.0)
}

fn map_usda_food(food: UsdaFood) -> ExternalProduct {
    let n = &food.food_nutrients;

    ExternalProduct {
        name: food.description,
        brand: food.brand_owner,
        barcode: food.gtin_upc,
        source: "usda".to_string(),
        calories: usda_nutrient(n, "Energy"),
        protein_g: usda_nutrient(n, "Protein"),
        carbs_g: usda_nutrient(n, "Carbohydrate, by difference"),
        fat_g: usda_nutrient(n, "Total lipid (fat)"),
        fiber_g: usda_nutrient(n, "Fiber, total dietary"),
        sugar_g: usda_nutrient(n, "Sugars, total including NLEA"),
        sodium_mg: usda_nutrient(n, "Sodium, Na"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_off_product() {
        let raw = json!({
            "product_name": "Rolled Oats",
            "brands": "Acme Foods",
            "code": "1234567890123",
            "nutriments": {
                "energy-kcal_100g": 379.0,
                "proteins_100g": 13.2,
                "carbohydrates_100g": 67.7,
                "fat_100g": 6.5,
                "fiber_100g": 10.1,
                "sugars_100g": "0.99",
                "sodium_100g": 0.002
            }
        });
        let product: OffProduct = serde_json::from_value(raw).unwrap();
        let mapped = map_off_product(product).unwrap();

        assert_eq!(mapped.name, "Rolled Oats");
        assert_eq!(mapped.source, "openfoodfacts");
        assert_eq!(mapped.calories, 379.0);
        // string-typed nutriment values still parse
        assert!((mapped.sugar_g - 0.99).abs() < 1e-9);
        // grams converted to milligrams
        assert!((mapped.sodium_mg - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_map_off_product_without_name_skipped() {
        let raw = json!({ "code": "000", "nutriments": {} });
        let product: OffProduct = serde_json::from_value(raw).unwrap();

        assert!(map_off_product(product).is_none());
    }

    #[test]
    fn test_map_off_product_missing_nutriments_zeroed() {
        let raw = json!({ "product_name": "Mystery Snack" });
        let product: OffProduct = serde_json::from_value(raw).unwrap();
        let mapped = map_off_product(product).unwrap();

        assert_eq!(mapped.calories, 0.0);
        assert_eq!(mapped.protein_g, 0.0);
    }

    #[test]
    fn test_map_usda_food() {
        let raw = json!({
            "description": "Cheddar Cheese",
            "brandOwner": "Dairy Co",
            "gtinUpc": "099900000001",
            "foodNutrients": [
                { "nutrientName": "Energy", "value": 403.0, "unitName": "KCAL" },
                { "nutrientName": "Protein", "value": 24.9, "unitName": "G" },
                { "nutrientName": "Total lipid (fat)", "value": 33.1, "unitName": "G" },
                { "nutrientName": "Sodium, Na", "value": 621.0, "unitName": "MG" }
            ]
        });
        let food: UsdaFood = serde_json::from_value(raw).unwrap();
        let mapped = map_usda_food(food);

        assert_eq!(mapped.name, "Cheddar Cheese");
        assert_eq!(mapped.source, "usda");
        assert_eq!(mapped.calories, 403.0);
        assert_eq!(mapped.sodium_mg, 621.0);
        // absent nutrient defaults to zero
        assert_eq!(mapped.fiber_g, 0.0);
    }
}
