//! HTML extraction for the recipe site
//!
//! Pure functions over page source so they can be tested against fixtures.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{IngredientRef, RecipeDetail, RecipePage, RecipeSummary};

/// Steps shorter than this are layout noise ("1", "팁!")
const MIN_STEP_CHARS: usize = 6;

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn material_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"viewMaterial\('(\d+)'\)").expect("valid material regex"))
}

fn digits_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digits regex"))
}

/// Collapse runs of whitespace (including newlines) into single spaces
fn clean_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(element: ElementRef<'_>, css: &str) -> Option<String> {
    let sel = selector(css)?;
    element
        .select(&sel)
        .next()
        .map(clean_text)
        .filter(|text| !text.is_empty())
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Extract the material code from a `viewMaterial('123')` link
pub fn extract_material_code(href: &str) -> Option<String> {
    material_code_regex()
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse a review counter such as "(1,234)" into a number
pub fn parse_review_count(text: &str) -> u32 {
    let cleaned = text.replace(',', "");
    digits_regex()
        .find(&cleaned)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}

/// Parse the search listing into recipe cards, in page order
///
/// Cards without a title or link are skipped.
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<RecipeSummary> {
    let document = Html::parse_document(html);
    let (Some(card_sel), Some(link_sel)) =
        (selector(".common_sp_list_li"), selector(".common_sp_link"))
    else {
        return Vec::new();
    };

    document
        .select(&card_sel)
        .filter_map(|card| {
            let title = first_text(card, ".common_sp_caption_tit")?;
            let href = card.select(&link_sel).next()?.value().attr("href")?;
            let reviews = first_text(card, ".common_sp_caption_rv_ea")
                .map(|text| parse_review_count(&text))
                .unwrap_or(0);

            Some(RecipeSummary {
                title,
                url: absolute_url(base_url, href),
                reviews,
            })
        })
        .collect()
}

fn parse_ingredient_row(row: ElementRef<'_>) -> Option<IngredientRef> {
    let link = selector(".ingre_list_name a").and_then(|sel| row.select(&sel).next());

    let code = link
        .and_then(|a| a.value().attr("href"))
        .and_then(extract_material_code);

    let name = match link {
        Some(a) => clean_text(a),
        None => first_text(row, ".ingre_list_name").unwrap_or_default(),
    };

    if name.is_empty() && code.is_none() {
        return None;
    }

    Some(IngredientRef {
        code,
        name,
        amount: first_text(row, ".ingre_list_ea"),
    })
}

/// Parse the image and confirmed ingredient list of a recipe page
pub fn parse_recipe_page(html: &str, url: &str) -> RecipePage {
    let document = Html::parse_document(html);

    let ingredients = selector("#divConfirmedMaterialArea ul li")
        .map(|sel| document.select(&sel).filter_map(parse_ingredient_row).collect())
        .unwrap_or_default();

    RecipePage {
        url: url.to_string(),
        image: first_attr(&document, "#main_thumbs", "src"),
        ingredients,
    }
}

fn collect_steps(document: &Html, css: &str) -> Vec<String> {
    selector(css)
        .map(|sel| {
            document
                .select(&sel)
                .map(clean_text)
                .filter(|step| step.chars().count() >= MIN_STEP_CHARS)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse everything shown on a recipe page
pub fn parse_recipe_detail(html: &str, url: &str) -> RecipeDetail {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = first_text(root, ".view2_summary h3")
        .or_else(|| first_attr(&document, r#"meta[property="og:title"]"#, "content"))
        .unwrap_or_default();

    let image = first_attr(&document, "#main_thumbs", "src")
        .or_else(|| first_attr(&document, r#"meta[property="og:image"]"#, "content"));

    let ingredients = selector("#divConfirmedMaterialArea ul li, .ready_ingre3 ul li")
        .map(|sel| {
            document
                .select(&sel)
                .filter_map(parse_ingredient_row)
                .filter(|row| !row.name.is_empty())
                .map(|row| match row.amount {
                    Some(amount) => format!("{} {}", row.name, amount),
                    None => row.name,
                })
                .collect()
        })
        .unwrap_or_default();

    let mut steps = collect_steps(&document, ".view_step_cont");
    if steps.is_empty() {
        steps = collect_steps(&document, ".view_step .view_step_cont_txt");
    }

    let tips = first_text(root, ".view2_summary_info, .cont_ingre2").unwrap_or_default();

    RecipeDetail {
        title,
        image,
        ingredients,
        steps,
        tips,
        url: url.to_string(),
    }
}
