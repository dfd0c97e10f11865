//! crates/course_chat_core/src/catalog.rs
//!
//! The fixed demo channels and seed messages each copilot starts with.

use crate::domain::{ChannelId, ChannelInfo, ChannelMode, Copilot};

/// An assistant message present before the user types anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMessage {
    pub channel: ChannelId,
    pub content: String,
}

/// Everything needed to mount a fresh session.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub mode: ChannelMode,
    pub channels: Vec<ChannelInfo>,
    pub initial_active: ChannelId,
    pub seed: Vec<SeedMessage>,
    /// Whether new empty channels may be created after mount.
    pub allows_new_chats: bool,
}

impl Catalog {
    pub fn for_copilot(copilot: Copilot) -> Self {
        match copilot {
            Copilot::CoPilot => per_channel_catalog(),
            Copilot::CoPilot2 => unified_catalog(),
            Copilot::Conversations => conversations_catalog(),
        }
    }
}

fn seed(channel: &str, content: &str) -> SeedMessage {
    SeedMessage {
        channel: ChannelId::new(channel),
        content: content.to_string(),
    }
}

// Tab colors follow course status: completed, in progress, upcoming.
fn per_channel_catalog() -> Catalog {
    Catalog {
        mode: ChannelMode::PerChannel,
        channels: vec![
            ChannelInfo::new("react", "React", "red"),
            ChannelInfo::new("javascript", "Adv JavaScript", "green"),
            ChannelInfo::new("java", "JAVA", "orange"),
        ],
        initial_active: ChannelId::new("javascript"),
        seed: vec![
            seed(
                "react",
                "Hello! I'm your React AI assistant. How can I help you with React today?",
            ),
            seed(
                "javascript",
                "Hi! I'm your Advanced JavaScript AI assistant. What would you like to learn?",
            ),
            seed(
                "java",
                "Hello! I'm your Java AI assistant. Ready to help you with Java programming!",
            ),
        ],
        allows_new_chats: false,
    }
}

fn unified_catalog() -> Catalog {
    Catalog {
        mode: ChannelMode::Unified,
        channels: vec![
            ChannelInfo::new("general", "Co-Pilot 2", "purple"),
            ChannelInfo::new("react", "React", "blue"),
            ChannelInfo::new("javascript", "Adv JavaScript", "yellow"),
            ChannelInfo::new("java", "JAVA", "orange"),
            ChannelInfo::new("python", "Python", "green"),
        ],
        initial_active: ChannelId::new("general"),
        seed: vec![
            seed(
                "react",
                "React Hooks are functions that let you use state and other React features in functional components. The most common ones are useState for managing state and useEffect for side effects. Would you like me to explain any specific hook in detail?",
            ),
            seed(
                "javascript",
                "In Advanced JavaScript, closures are a powerful concept where inner functions have access to outer function variables even after the outer function has returned. This is fundamental for understanding how JavaScript manages scope and can be used for creating private variables and function factories.",
            ),
            seed(
                "java",
                "In JAVA, the Object-Oriented Programming (OOP) principles include Encapsulation, Inheritance, Polymorphism, and Abstraction. These concepts help in creating modular, reusable, and maintainable code. Would you like to dive deeper into any specific OOP concept?",
            ),
        ],
        allows_new_chats: false,
    }
}

// Conversations newest first; each one is about a single course.
fn conversations_catalog() -> Catalog {
    Catalog {
        mode: ChannelMode::PerChannel,
        channels: vec![
            ChannelInfo::new("chat-1", "React", "red").with_title("Understanding React Hooks"),
            ChannelInfo::new("chat-2", "Adv JavaScript", "green")
                .with_title("Advanced JavaScript Concepts"),
            ChannelInfo::new("chat-3", "JAVA", "orange").with_title("Java Programming Basics"),
        ],
        initial_active: ChannelId::new("chat-1"),
        seed: vec![
            seed(
                "chat-1",
                "Hello! I'm your React AI assistant. How can I help you with React today?",
            ),
            seed(
                "chat-2",
                "Hi! I'm your Advanced JavaScript AI assistant. What would you like to learn?",
            ),
            seed(
                "chat-3",
                "Hello! I'm your Java AI assistant. Ready to help you with Java programming!",
            ),
        ],
        allows_new_chats: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_seed_and_initial_channel_exists() {
        for copilot in [Copilot::CoPilot, Copilot::CoPilot2, Copilot::Conversations] {
            let catalog = Catalog::for_copilot(copilot);
            let known = |id: &ChannelId| catalog.channels.iter().any(|c| &c.id == id);
            assert!(known(&catalog.initial_active));
            assert!(catalog.seed.iter().all(|s| known(&s.channel)));
            assert_eq!(catalog.mode, copilot.channel_mode());
            assert_eq!(catalog.allows_new_chats, copilot.allows_new_chats());
        }
    }
}
