//! Content model - briefs and the business context they are written for.

use serde::{Deserialize, Serialize};

/// Kind of marketing content being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    BlogPost,
    Email,
    SocialPost,
    Hook,
    AdCopy,
    LandingPage,
}

impl ContentType {
    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::BlogPost => "blog post",
            ContentType::Email => "marketing email",
            ContentType::SocialPost => "social media post",
            ContentType::Hook => "attention hook",
            ContentType::AdCopy => "ad copy",
            ContentType::LandingPage => "landing page copy",
        }
    }

    /// Default length target in words when the brief does not set one.
    pub fn default_word_target(&self) -> usize {
        match self {
            ContentType::BlogPost => 900,
            ContentType::Email => 250,
            ContentType::SocialPost => 60,
            ContentType::Hook => 25,
            ContentType::AdCopy => 50,
            ContentType::LandingPage => 400,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What to write, for whom, and in which voice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBrief {
    /// Content type
    pub content_type: ContentType,

    /// Topic or subject line
    pub topic: String,

    /// Points the content must cover
    #[serde(default)]
    pub key_points: Vec<String>,

    /// Free-form instructions from the requester
    #[serde(default)]
    pub instructions: Option<String>,

    /// Length target in words
    #[serde(default)]
    pub target_words: Option<usize>,

    /// Target audience
    #[serde(default)]
    pub audience: Option<IcpProfile>,

    /// Brand voice guidelines
    #[serde(default)]
    pub brand: Option<BrandVoice>,

    /// Business context snapshot
    #[serde(default)]
    pub business: Option<BusinessContext>,
}

impl ContentBrief {
    /// Create a brief with only a type and topic.
    pub fn new(content_type: ContentType, topic: impl Into<String>) -> Self {
        Self {
            content_type,
            topic: topic.into(),
            key_points: Vec::new(),
            instructions: None,
            target_words: None,
            audience: None,
            brand: None,
            business: None,
        }
    }

    /// Add a key point.
    pub fn with_key_point(mut self, point: impl Into<String>) -> Self {
        self.key_points.push(point.into());
        self
    }

    /// Set free-form instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the target audience.
    pub fn with_audience(mut self, audience: IcpProfile) -> Self {
        self.audience = Some(audience);
        self
    }

    /// Set brand voice.
    pub fn with_brand(mut self, brand: BrandVoice) -> Self {
        self.brand = Some(brand);
        self
    }

    /// Set business context.
    pub fn with_business(mut self, business: BusinessContext) -> Self {
        self.business = Some(business);
        self
    }

    /// Effective length target in words.
    pub fn word_target(&self) -> usize {
        self.target_words
            .unwrap_or_else(|| self.content_type.default_word_target())
    }

    /// All text in the brief that came from the requester.
    ///
    /// This is what gets screened for prompt injection before generation,
    /// so it covers every free-text field that can reach a prompt.
    pub fn requester_text(&self) -> String {
        let mut parts = vec![self.topic.clone()];
        parts.extend(self.key_points.iter().cloned());
        parts.extend(self.instructions.iter().cloned());

        if let Some(audience) = &self.audience {
            parts.push(audience.name.clone());
            parts.extend(audience.pain_points.iter().cloned());
            parts.extend(audience.goals.iter().cloned());
            parts.extend(audience.demographics.iter().cloned());
        }
        if let Some(brand) = &self.brand {
            parts.push(brand.tone.clone());
            parts.extend(brand.values.iter().cloned());
            parts.extend(brand.words_to_avoid.iter().cloned());
        }
        if let Some(business) = &self.business {
            parts.push(business.company_name.clone());
            parts.extend(business.industry.iter().cloned());
            parts.extend(business.value_proposition.iter().cloned());
            parts.extend(business.competitors.iter().cloned());
        }

        parts.retain(|p| !p.trim().is_empty());
        parts.join("\n")
    }

    /// Brief rendered as a plain-text context block for prompts.
    pub fn context_block(&self) -> String {
        let mut out = format!(
            "Content type: {}\nTopic: {}\nTarget length: about {} words\n",
            self.content_type.label(),
            self.topic,
            self.word_target()
        );

        if !self.key_points.is_empty() {
            out.push_str("Key points:\n");
            for point in &self.key_points {
                out.push_str(&format!("- {}\n", point));
            }
        }

        if let Some(audience) = &self.audience {
            out.push_str(&format!("Audience (ICP): {}\n", audience.name));
            if !audience.pain_points.is_empty() {
                out.push_str(&format!("  Pain points: {}\n", audience.pain_points.join("; ")));
            }
            if !audience.goals.is_empty() {
                out.push_str(&format!("  Goals: {}\n", audience.goals.join("; ")));
            }
            if let Some(demographics) = &audience.demographics {
                out.push_str(&format!("  Demographics: {}\n", demographics));
            }
        }

        if let Some(brand) = &self.brand {
            out.push_str(&format!("Brand tone: {}\n", brand.tone));
            if !brand.values.is_empty() {
                out.push_str(&format!("  Brand values: {}\n", brand.values.join(", ")));
            }
            if !brand.words_to_avoid.is_empty() {
                out.push_str(&format!("  Never use: {}\n", brand.words_to_avoid.join(", ")));
            }
        }

        if let Some(business) = &self.business {
            out.push_str(&format!("Company: {}\n", business.company_name));
            if let Some(industry) = &business.industry {
                out.push_str(&format!("  Industry: {}\n", industry));
            }
            if let Some(value) = &business.value_proposition {
                out.push_str(&format!("  Value proposition: {}\n", value));
            }
        }

        out
    }
}

/// Ideal Customer Profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcpProfile {
    /// Profile name, e.g. "Series A SaaS founders"
    pub name: String,

    /// Problems the audience is trying to solve
    #[serde(default)]
    pub pain_points: Vec<String>,

    /// Outcomes the audience wants
    #[serde(default)]
    pub goals: Vec<String>,

    /// Demographic or firmographic notes
    #[serde(default)]
    pub demographics: Option<String>,
}

/// Brand voice guidelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandVoice {
    /// Tone, e.g. "confident, warm, no jargon"
    pub tone: String,

    /// Brand values
    #[serde(default)]
    pub values: Vec<String>,

    /// Words and phrases the brand never uses
    #[serde(default)]
    pub words_to_avoid: Vec<String>,
}

/// Business Context Manifest snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessContext {
    /// Company name
    pub company_name: String,

    /// Industry
    #[serde(default)]
    pub industry: Option<String>,

    /// Value proposition
    #[serde(default)]
    pub value_proposition: Option<String>,

    /// Competitor names that should not be promoted
    #[serde(default)]
    pub competitors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_target_defaults_by_type() {
        let brief = ContentBrief::new(ContentType::Hook, "launch");
        assert_eq!(brief.word_target(), 25);

        let mut brief = ContentBrief::new(ContentType::BlogPost, "launch");
        brief.target_words = Some(1200);
        assert_eq!(brief.word_target(), 1200);
    }

    #[test]
    fn test_requester_text_includes_instructions() {
        let brief = ContentBrief::new(ContentType::Email, "Spring sale")
            .with_key_point("20% off")
            .with_instructions("Keep it short");
        let text = brief.requester_text();
        assert!(text.contains("Spring sale"));
        assert!(text.contains("20% off"));
        assert!(text.contains("Keep it short"));
    }

    #[test]
    fn test_requester_text_covers_context_fields() {
        let brief = ContentBrief::new(ContentType::Email, "Spring sale")
            .with_audience(IcpProfile {
                name: "Busy parents".to_string(),
                goals: vec!["save time".to_string()],
                demographics: Some("30-45".to_string()),
                ..Default::default()
            })
            .with_brand(BrandVoice {
                tone: "warm".to_string(),
                values: vec!["honesty".to_string()],
                words_to_avoid: vec!["cheap".to_string()],
            })
            .with_business(BusinessContext {
                company_name: "Acme".to_string(),
                industry: Some("retail".to_string()),
                value_proposition: Some("fast delivery".to_string()),
                competitors: vec!["Globex".to_string()],
            });
        let text = brief.requester_text();
        for expected in [
            "Busy parents", "save time", "30-45", "warm", "honesty", "cheap", "Acme", "retail",
            "fast delivery", "Globex",
        ] {
            assert!(text.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_context_block() {
        let brief = ContentBrief::new(ContentType::Email, "Spring sale")
            .with_key_point("20% off")
            .with_audience(IcpProfile {
                name: "Busy parents".to_string(),
                pain_points: vec!["no time".to_string()],
                ..Default::default()
            })
            .with_brand(BrandVoice {
                tone: "warm".to_string(),
                words_to_avoid: vec!["cheap".to_string()],
                ..Default::default()
            });
        let block = brief.context_block();
        assert!(block.starts_with("Content type: marketing email"));
        assert!(block.contains("- 20% off"));
        assert!(block.contains("Audience (ICP): Busy parents"));
        assert!(block.contains("Pain points: no time"));
        assert!(block.contains("Never use: cheap"));
        assert!(!block.contains("Company:"));
    }

    #[test]
    fn test_brief_deserializes_with_defaults() {
        let brief: ContentBrief = serde_json::from_str(
            r#"{"content_type": "social_post", "topic": "New feature"}"#,
        )
        .unwrap();
        assert_eq!(brief.content_type, ContentType::SocialPost);
        assert!(brief.key_points.is_empty());
        assert!(brief.brand.is_none());
    }
}
