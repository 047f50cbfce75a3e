//! Static outreach template. The last tier of the content fallback chain.
//!
//! Deterministic and infallible: keyed only on whether the business has a website.

use super::entities::{OutreachDraft, PlaceDetail};

/// Provider label reported for template-generated content.
pub const STATIC_PROVIDER: &str = "static-template";

pub fn static_outreach(detail: &PlaceDetail) -> OutreachDraft {
    let name = detail.name.as_str();
    let category = detail.category_label();
    let vicinity = detail.vicinity_or_empty();

    let email = match detail.website() {
        None => format!(
            "Subject: Digital Transformation for {name}\n\n\
             Dear {name} Team,\n\n\
             I noticed you don't have a website for your {category} business in {vicinity}. \
             We specialize in building high-converting sites."
        ),
        Some(website) => format!(
            "Subject: SEO Optimization for {name}\n\n\
             Dear {name} Team,\n\n\
             I visited your website at {website} and noticed some areas for optimization."
        ),
    };

    OutreachDraft {
        email,
        antigravity_prompt: format!(
            "Create a website for {name} ({category}) in {vicinity}. Sections: Hero, Services, Contact."
        ),
        description: format!(
            "{name} is a local {category} in {vicinity}. No detailed AI description is currently available."
        ),
    }
}
