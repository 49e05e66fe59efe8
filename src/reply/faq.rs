//! Keyword and FAQ reply backend for the Test Centre
//!
//! Messages are classified by whole-word keyword matching and answered from a
//! fixed FAQ and topic table. No model, no session state: the same message
//! always gets the same reply.

use super::ReplyService;
use async_trait::async_trait;

/// Reply to an empty or blank message
pub const EMPTY_PROMPT_REPLY: &str = "Please enter your question about the Test Centre.";

/// Reply when nothing in the message is recognised
pub const UNKNOWN_REPLY: &str = "I apologize, but I'm not sure about that specific query. How else can I help you with the Test Centre today?";

pub const GREETINGS: [&str; 4] = [
    "Welcome to Ontario Tech's Test Centre! How can I assist you with accommodations or test bookings today?",
    "Hello! I'm here to help with Test Centre services. What information do you need?",
    "Hi there! I can help you with test bookings, accommodations, and other Test Centre questions. What brings you here today?",
    "Welcome! I'm your Test Centre Assistant. How may I help you with your testing needs?",
];

pub const FAREWELLS: [&str; 4] = [
    "Thank you for contacting the Test Centre. Don't hesitate to reach out if you need anything else!",
    "I hope I've helped answer your questions. Feel free to email testcentre@ontariotechu.ca for any additional support.",
    "Thanks for your questions! Remember to book your tests at least 7 days in advance. Have a great day!",
    "Glad I could help! Don't forget to check the SAS Portal for your latest accommodation details.",
];

const LOCATION_REPLY: &str = "The Test Centre has two locations at Ontario Tech University:\n1. North Campus: Shawenjigewining Hall (formerly UA Building), Room 343A, 3rd floor, near the Student Life office\n2. Downtown Campus: Charles Hall, Room 236, 2nd floor, near the Student Services desk\n\nBoth locations are accessible via elevator and equipped with assistive technologies.";

const BOOKING_REPLY: &str = "To book a test, follow these steps:\n1. Log into the Student Accessibility Services (SAS) Portal\n2. Select 'Book Assessment'\n3. Choose your course and test date\n4. Submit your booking at least 7 days in advance\n\nFall 2024 finals must be booked by November 13, 2024 and Winter 2025 finals by March 17, 2025.";

const ACCOMMODATION_REPLY: &str = "Accommodations must be approved by Student Accessibility Services (SAS) before you book, and renewed each semester. Available accommodations include extended time, a quiet space, assistive technology, breaks and reader/scribe services. For online tests, extra time is added automatically in Canvas.";

const CONTACT_REPLY: &str = "You can reach the Test Centre by email at testcentre@ontariotechu.ca. Replies usually take 1-2 business days. Please include your student number, course code and assessment details. For urgent matters, visit either Test Centre location during business hours.";

/// What a message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Greeting,
    Farewell,
    Location,
    Booking,
    Accommodation,
    Contact,
    /// Nothing recognised
    Conversation,
}

impl QueryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::Location => "location",
            Self::Booking => "booking",
            Self::Accommodation => "accommodation",
            Self::Contact => "contact",
            Self::Conversation => "conversation",
        }
    }
}

// Checked in this order; the first type with a matching term wins
static QUERY_TERMS: [(QueryType, &[&str]); 6] = [
    (
        QueryType::Greeting,
        &[
            "hello", "hi", "hey", "good morning", "good afternoon", "good evening", "greetings",
            "howdy", "hola", "morning", "afternoon", "evening",
        ],
    ),
    (
        QueryType::Farewell,
        &[
            "bye", "goodbye", "thanks", "thank you", "appreciate", "helped", "understood",
            "got it", "see you", "take care", "have a good day",
        ],
    ),
    (
        QueryType::Location,
        &[
            "where", "location", "building", "room", "floor", "campus", "downtown", "north", "ua",
            "charles", "shawenjigewining", "find", "get to", "directions", "address", "situated",
            "located", "place",
        ],
    ),
    (
        QueryType::Booking,
        &[
            "book", "register", "sign up", "schedule", "appointment", "deadline", "date", "time",
            "slot", "reservation", "when", "available", "upcoming", "registration", "reserve",
        ],
    ),
    (
        QueryType::Accommodation,
        &[
            "accommodation", "extra time", "extension", "quiet", "modify", "change", "update",
            "renew", "letter", "sas", "accessibility", "support", "special needs", "assistance",
            "aids",
        ],
    ),
    (
        QueryType::Contact,
        &[
            "contact", "email", "reach", "phone", "call", "speak", "talk", "inquire",
            "get in touch", "connect", "communicate",
        ],
    ),
];

struct Faq {
    question: &'static str,
    variations: &'static [&'static str],
    answer: &'static str,
}

static FAQS: [Faq; 8] = [
    Faq {
        question: "How do I contact the Test Centre?",
        variations: &[
            "what's the test centre email",
            "how can I reach the test centre",
            "test centre contact info",
            "who do I contact about accommodations",
            "test centre phone number",
            "how to get in touch with test centre",
            "contact information for testing",
        ],
        answer: "The best way to contact the Test Centre is by email at testcentre@ontariotechu.ca. They typically respond within 1-2 business days. For urgent matters, you can visit either Test Centre location during business hours.",
    },
    Faq {
        question: "Where is the Test Centre located?",
        variations: &[
            "where is the test centre",
            "test centre building",
            "where can I find the test centre",
            "test centre room number",
            "which building is the test centre in",
            "test centre campus location",
            "downtown test centre",
            "north campus test centre",
            "how do I get to the test centre",
            "directions to test centre",
            "where is testing services",
        ],
        answer: "The Test Centre has two locations:\n1. North Campus: Shawenjigewining Hall (formerly UA Building), Room 343A (3rd floor, near Student Life)\n2. Downtown Campus: Charles Hall, Room 236 (2nd floor, near Student Services)\n\nBoth locations are accessible via elevator and stairs.",
    },
    Faq {
        question: "What are the booking deadlines for assessments?",
        variations: &[
            "when do I need to book by",
            "test booking deadline",
            "final exam registration deadline",
            "when should I book my test",
            "last day to book",
            "registration cutoff",
            "how far in advance to book",
            "assessment booking deadline",
            "deadline for test booking",
        ],
        answer: "All tests, quizzes and mid-terms must be booked a minimum of 7 days in advance of your test date. For Fall 2024 finals, the registration deadline is November 13, 2024. For Winter 2025 finals, the deadline is March 17, 2025. Late bookings require special approval and may not be guaranteed.",
    },
    Faq {
        question: "What happens if I miss the booking deadline?",
        variations: &[
            "late test booking",
            "missed the deadline",
            "forgot to book",
            "past the booking deadline",
            "too late to book",
            "book after the deadline",
            "missed registration deadline",
            "deadline passed",
        ],
        answer: "If you miss the booking deadline, you must contact testcentre@ontariotechu.ca immediately. While late booking requests are reviewed case-by-case, there's no guarantee they will be approved, and some accommodations may not be available. Always try to book at least 7 days in advance to ensure your accommodations can be provided.",
    },
    Faq {
        question: "How do I book accommodated assessments?",
        variations: &[
            "how to book a test",
            "how do I book",
            "booking process",
            "schedule an exam",
            "make a test booking",
            "schedule assessment",
            "how to register for test",
            "exam booking steps",
        ],
        answer: "To book an accommodated assessment:\n1. Log into the Student Accessibility Services (SAS) Portal\n2. Click on 'Book Assessment'\n3. Select your course and test date\n4. Verify your accommodations\n5. Submit your booking request\n\nRemember: Each assessment requires a separate booking and must be made at least 7 days in advance.",
    },
    Faq {
        question: "What are the requirements for eligibility?",
        variations: &[
            "who can use the test centre",
            "test centre eligibility",
            "accommodation requirements",
            "can I use the test centre",
            "who is eligible",
            "documentation needed",
            "registration requirements",
        ],
        answer: "To be eligible for Test Centre services, you must:\n1. Be registered with Student Accessibility Services (SAS)\n2. Have current medical documentation supporting your accommodations\n3. Be authorized by your Accessibility Specialist\n4. Have approved testing accommodations\n5. Renew your accommodations each semester",
    },
    Faq {
        question: "How do online assessments work?",
        variations: &[
            "online test accommodations",
            "virtual assessment process",
            "remote testing",
            "canvas accommodations",
            "online exam",
            "remote exam accommodations",
        ],
        answer: "For online assessments:\n1. TCIS coordinates with your instructors\n2. Time-based accommodations (extra time, breaks) are applied automatically in Canvas\n3. You must still book through the SAS Portal\n4. Technical issues should be reported immediately to testcentre@ontariotechu.ca",
    },
    Faq {
        question: "Will my accommodations be automatically coordinated?",
        variations: &[
            "automatic accommodations",
            "do I need to request accommodations",
            "accommodation renewal",
            "setup accommodations",
            "semester accommodation",
        ],
        answer: "No, accommodations are not automatic. You must:\n1. Opt into accommodations each semester\n2. Review and accept them through the SAS Portal\n3. Send accommodation letters to professors\n4. Book each test separately\n\nIt's your responsibility to ensure accommodations are renewed and properly set up each term.",
    },
];

/// Lowercase words of `text`, split on anything that is not a letter or digit
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `word` is `term` or a plain inflection of it ("booking", "rooms").
/// Short terms such as "hi" only match exactly.
fn word_matches(word: &str, term: &str) -> bool {
    word == term
        || (term.len() >= 3
            && word
                .strip_prefix(term)
                .is_some_and(|rest| matches!(rest, "s" | "es" | "ed" | "ing")))
}

/// Whether `phrase` appears in `message` as a run of whole words
fn contains_phrase(message: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty()
        && message
            .windows(phrase.len())
            .any(|window| window.iter().zip(phrase).all(|(w, t)| word_matches(w, t)))
}

fn matches_any(message: &[String], terms: &[&str]) -> bool {
    terms
        .iter()
        .any(|term| contains_phrase(message, &words(term)))
}

/// Classify a message by keyword
pub fn detect_query_type(message: &str) -> QueryType {
    let message = words(message);
    QUERY_TERMS
        .iter()
        .find(|(_, terms)| matches_any(&message, terms))
        .map_or(QueryType::Conversation, |(query_type, _)| *query_type)
}

/// Answer of the FAQ entry with the longest question or variation found in
/// the message
fn find_faq_answer(message: &str) -> Option<&'static str> {
    let message = words(message);
    FAQS.iter()
        .flat_map(|faq| {
            std::iter::once(faq.question)
                .chain(faq.variations.iter().copied())
                .map(move |phrase| (faq.answer, words(phrase)))
        })
        .filter(|(_, phrase)| contains_phrase(&message, phrase))
        .max_by_key(|(_, phrase)| phrase.len())
        .map(|(answer, _)| answer)
}

/// Canned replies vary with the message but stay deterministic
fn pick(replies: &'static [&'static str], message: &str) -> &'static str {
    replies[message.chars().count() % replies.len()]
}

/// Reply backend answering Test Centre questions from a fixed FAQ
#[derive(Debug, Clone, Copy, Default)]
pub struct FaqReplyService;

impl FaqReplyService {
    /// Reply to one message. FAQ matches win over greetings, so
    /// "hi, where is the test centre" gets directions.
    pub fn answer(message: &str) -> &'static str {
        let message = message.trim();
        if message.is_empty() {
            return EMPTY_PROMPT_REPLY;
        }
        if let Some(answer) = find_faq_answer(message) {
            return answer;
        }

        let query_type = detect_query_type(message);
        tracing::debug!(query_type = query_type.as_str(), "No FAQ match");
        match query_type {
            QueryType::Greeting => pick(&GREETINGS, message),
            QueryType::Farewell => pick(&FAREWELLS, message),
            QueryType::Location => LOCATION_REPLY,
            QueryType::Booking => BOOKING_REPLY,
            QueryType::Accommodation => ACCOMMODATION_REPLY,
            QueryType::Contact => CONTACT_REPLY,
            QueryType::Conversation => UNKNOWN_REPLY,
        }
    }
}

#[async_trait]
impl ReplyService for FaqReplyService {
    async fn reply(&self, message: &str) -> String {
        Self::answer(message).to_string()
    }

    fn name(&self) -> &str {
        "faq"
    }
}
