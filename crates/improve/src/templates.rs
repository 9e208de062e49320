//! Writer prompt templates, one per content type.

use contentgate_core::{ContentBrief, ContentType};

/// System instruction for the writer model.
pub const WRITER_SYSTEM_PROMPT: &str = "You are an experienced B2B marketing copywriter. \
Write in the brand's voice for the stated audience. Make only claims you can support, \
never invent statistics, and never include personal data. \
Reply with the finished copy only, without commentary or markdown fences.";

fn guidance(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::BlogPost => {
            "Write a blog post with a headline, a short hook paragraph, 3-5 sections with \
             descriptive subheadings, and a closing paragraph that ends in a clear call to action."
        }
        ContentType::Email => {
            "Write a marketing email. Start with a line `Subject: ...` (under 60 characters), \
             then a greeting, a focused body with one main message, and a single call to action."
        }
        ContentType::SocialPost => {
            "Write one social media post. Open with a scroll-stopping first line, keep sentences \
             short, and end with a call to action. At most three hashtags."
        }
        ContentType::Hook => {
            "Write one attention hook: a single sentence or question that names the reader's \
             pain and promises a specific payoff."
        }
        ContentType::AdCopy => {
            "Write ad copy with a headline (under 40 characters), a description (under 90 \
             characters), and a call-to-action button label."
        }
        ContentType::LandingPage => {
            "Write landing page copy: hero headline, subheadline, three benefit blocks, a short \
             social-proof section placeholder, and a primary call to action."
        }
    }
}

/// Prompt for the first draft.
pub fn build_draft_prompt(brief: &ContentBrief) -> String {
    let mut prompt = format!("{}\n\n## Brief\n{}", guidance(brief.content_type), brief.context_block());
    if let Some(instructions) = &brief.instructions {
        prompt.push_str(&format!("\n## Requester notes\n{}\n", instructions.trim()));
    }
    prompt
}

/// Prompt for rewriting `content` according to review feedback.
pub fn build_revision_prompt(brief: &ContentBrief, content: &str, feedback: &str) -> String {
    format!(
        "Revise the {} below so it fixes every issue in the review. \
         Keep what already works. Return the full revised copy.\n\n\
         ## Brief\n{}\n## Review\n{}\n## Current draft\n<<<DRAFT\n{}\nDRAFT>>>\n",
        brief.content_type.label(),
        brief.context_block(),
        feedback.trim(),
        content.trim()
    )
}
