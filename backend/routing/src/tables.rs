//! Canned reply tables.
//!
//! The keyword table is scanned in declaration order and the first keyword
//! contained in the message wins, so order here is behavior. The button and
//! list tables are exact-match only.

/// Free-text keywords, matched by case-insensitive substring containment.
pub static KEYWORD_REPLIES: ReplyTable = ReplyTable::new(&[
    (
        "hello",
        "Hello! 👋 Welcome to our business chatbot. How can I help you today?",
    ),
    ("hi", "Hi there! 👋 How can I assist you?"),
    (
        "help",
        "Here are some things I can help you with:\n• Business hours\n• Services\n• Contact information\n• Location\n• Pricing\n\nJust ask me about any of these topics!",
    ),
    (
        "hours",
        "Our business hours are:\n📅 Monday - Friday: 9:00 AM - 6:00 PM\n📅 Saturday: 10:00 AM - 4:00 PM\n📅 Sunday: Closed",
    ),
    (
        "services",
        "We offer the following services:\n• Service 1\n• Service 2\n• Service 3\n• Service 4\n\nWould you like more details about any specific service?",
    ),
    (
        "contact",
        "You can reach us at:\n📞 Phone: +1-234-567-8900\n📧 Email: contact@business.com\n🌐 Website: www.business.com",
    ),
    (
        "location",
        "📍 We're located at:\n123 Business Street\nCity, State 12345\n\nWe're open for visits during business hours!",
    ),
    (
        "pricing",
        "For pricing information, please contact us directly or visit our website. We offer competitive rates for all our services!",
    ),
    (
        "thanks",
        "You're welcome! 😊 Is there anything else I can help you with?",
    ),
    (
        "bye",
        "Goodbye! 👋 Have a great day! Feel free to message us anytime.",
    ),
]);

/// Replies keyed by `button_reply.id`.
pub static BUTTON_REPLIES: ReplyTable = ReplyTable::new(&[
    (
        "btn_services",
        "Great! Here are our main services:\n• Consultation\n• Implementation\n• Support\n• Training\n\nWhich one interests you most?",
    ),
    (
        "btn_contact",
        "Here's how to reach us:\n📞 Phone: +1-234-567-8900\n📧 Email: contact@business.com",
    ),
    (
        "btn_hours",
        "Our business hours are:\n📅 Mon-Fri: 9:00 AM - 6:00 PM\n📅 Saturday: 10:00 AM - 4:00 PM\n📅 Sunday: Closed",
    ),
]);

/// Replies keyed by `list_reply.id`.
pub static LIST_REPLIES: ReplyTable = ReplyTable::new(&[
    (
        "service_1",
        "You selected Service 1. This includes comprehensive consultation and basic implementation. Would you like to schedule a meeting?",
    ),
    (
        "service_2",
        "You selected Service 2. This is our premium package with full support. Let me connect you with our sales team.",
    ),
    (
        "service_3",
        "You selected Service 3. This is perfect for ongoing maintenance. I can help you get started right away!",
    ),
]);

/// Sent when no keyword matches a text message.
pub const UNRECOGNIZED_TEXT_REPLY: &str = "I'm sorry, I didn't understand that. Type 'help' to see what I can assist you with, or contact our support team for more specific inquiries.";

/// Sent for a button or list selection with no canned reply.
pub const SELECTION_ACK_REPLY: &str = "Thank you for your selection!";

/// Sent for message types other than text and interactive.
pub const TEXT_ONLY_REPLY: &str =
    "I can only process text messages at the moment. Please send me a text message!";

/// Immutable ordered key → reply table.
#[derive(Debug)]
pub struct ReplyTable {
    entries: &'static [(&'static str, &'static str)],
}

impl ReplyTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Reply for a key that equals `key` exactly.
    pub fn exact(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, reply)| *reply)
    }

    /// Reply for the first key, in table order, contained in `haystack`.
    ///
    /// `haystack` must already be lowercased; keys are stored lowercase.
    pub fn first_contained(&self, haystack: &str) -> Option<(&'static str, &'static str)> {
        self.entries
            .iter()
            .find(|(k, _)| haystack.contains(*k))
            .copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }
}
