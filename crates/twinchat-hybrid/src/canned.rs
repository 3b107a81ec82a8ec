//! Fixed topic table answered without retrieval or generation.

use serde_json::{Map, Value};

use twinchat_core::types::{ChatResponse, ResponseKind};

pub struct CannedTopic {
    /// Lower-case phrase looked for in the message; doubles as the response type.
    pub name: &'static str,
    pub response: &'static str,
    pub detail_key: &'static str,
    pub detail_items: &'static [&'static str],
}

impl CannedTopic {
    pub fn to_response(&self) -> ChatResponse {
        let mut response = ChatResponse::new(ResponseKind::Topic(self.name.to_string()), self.response);
        let mut details = Map::new();
        details.insert("response".to_string(), Value::from(self.response));
        details.insert(self.detail_key.to_string(), Value::from(self.detail_items.to_vec()));
        response.details = Some(Value::Object(details));
        response
    }
}

/// Definition order is match priority.
pub const TOPICS: &[CannedTopic] = &[
    CannedTopic {
        name: "personal projects",
        response: "I've built several impactful projects including JenoAI.com (Vibe Marketing Platform), PMFlow (Vibe Research Platform), and MediScribe (Medical Grade Transcription Tool). Each project focuses on solving real user problems with AI and modern tech stacks.",
        detail_key: "projects",
        detail_items: &["JenoAI.com", "PMFlow", "MediScribe"],
    },
    CannedTopic {
        name: "product launches",
        response: "I've successfully launched multiple products from 0 to 1. At Postman, I launched the Academy platform reaching 100K+ developers. At Crio.Do, I built project-based learning platforms. My approach focuses on rapid iteration and user feedback.",
        detail_key: "highlights",
        detail_items: &["Postman Academy", "Crio.Do Learning Platform", "Community-driven launches"],
    },
    CannedTopic {
        name: "product growth hacks",
        response: "My growth strategies center around community building and product-led growth. I've used flywheel models to drive self-serve adoption, implemented 50+ A/B tests improving activation by 25%, and built developer communities that drive 30% of new user acquisition.",
        detail_key: "techniques",
        detail_items: &["Flywheel Modeling", "A/B Testing", "Community-led Growth", "Product-led Growth"],
    },
    CannedTopic {
        name: "vibecoding",
        response: "Vibecoding is my approach to rapid prototyping and iteration. It's about building with intuition first, then validating with data. I use AI tools to accelerate development while maintaining human expertise for critical decisions. Think: vibe research → vibe code → iterate.",
        detail_key: "principles",
        detail_items: &["Intuition-first development", "AI-accelerated prototyping", "Human expertise for critical decisions"],
    },
    CannedTopic {
        name: "learn by doing",
        response: "I've championed project-based learning for 5+ years. At Postman Academy and Crio.Do, I built platforms that teach through real projects. The philosophy: you learn best by building, not just reading. This approach has helped 100K+ developers accelerate their learning.",
        detail_key: "platforms",
        detail_items: &["Postman Academy", "Crio.Do", "Project-based curriculum design"],
    },
];

pub const GENERAL_REPLY: &str = "Thanks for your message! I'd be happy to share insights about my work. Feel free to ask about my projects, growth strategies, or any specific topic.";

/// First topic whose name occurs in the lower-cased message.
pub fn find_topic(message: &str) -> Option<&'static CannedTopic> {
    let lower = message.to_lowercase();
    TOPICS.iter().find(|t| lower.contains(t.name))
}

pub fn general_response() -> ChatResponse {
    ChatResponse::new(ResponseKind::General, GENERAL_REPLY)
}
