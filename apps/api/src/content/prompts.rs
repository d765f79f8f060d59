// Prompt template for SEO content generation.
// Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

use crate::content::models::PromptContext;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Content prompt template.
/// Replace: {json_only}, {business_name}, {service}, {city}, {target_audience},
///          {primary_keyword}, {secondary_keywords}, {tone}, {cta}
pub const CONTENT_PROMPT_TEMPLATE: &str = r#"You are an expert local SEO copywriter.

{json_only}

The JSON object must have EXACTLY these four keys: "metaTitle", "metaDescription", "html", "schemaJsonLd".

Field requirements:
- metaTitle: 50-60 characters. Include the primary keyword and the city.
- metaDescription: 140-160 characters. Persuasive, includes the primary keyword and ends with the call to action.
- html: clean semantic HTML for the page body only (no <html>, <head> or <body> tags). It must contain:
  - exactly one <h1>
  - several <h2> section headings
  - an FAQ section with exactly 3 questions, each an <h3> followed by a <p> answer
  - a final call-to-action section
- schemaJsonLd: a JSON-LD object with "@context": "https://schema.org" and "@type": "FAQPage" whose "mainEntity" questions and answers match the FAQ in the html exactly.

Business context:
- Business name: {business_name}
- Service: {service}
- City: {city}
- Target audience: {target_audience}
- Primary keyword: {primary_keyword}
- Secondary keywords: {secondary_keywords}
- Tone: {tone}
- Call to action: {cta}"#;

/// Fills the content template with the request's business context.
pub fn build_content_prompt(ctx: &PromptContext) -> String {
    let secondary_keywords = ctx.secondary_keywords.join(", ");

    fill_template(
        CONTENT_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("business_name", &ctx.business_name),
            ("service", &ctx.service),
            ("city", &ctx.city),
            ("target_audience", &ctx.target_audience),
            ("primary_keyword", &ctx.primary_keyword),
            ("secondary_keywords", &secondary_keywords),
            ("tone", &ctx.tone),
            ("cta", &ctx.cta),
        ],
    )
}

/// Single-pass `{name}` substitution. Inserted values are never rescanned,
/// so user text that looks like a placeholder stays verbatim. Unknown
/// placeholders are left as written.
///
/// A `.replace()` chain would expand a business name such as
/// `"{city} Plumbing"` when `{city}` is filled after it; business fields
/// must reach the model exactly as typed.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
