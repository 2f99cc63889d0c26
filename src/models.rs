/// The four fixed option identifiers of a multiple choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Letter::A => 0,
            Letter::B => 1,
            Letter::C => 2,
            Letter::D => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Letter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let first = chars.next().ok_or(())?;
        if chars.next().is_some() {
            return Err(());
        }
        Letter::from_char(first).ok_or(())
    }
}

/// A parsed multiple choice question. All four options are always present;
/// a model response missing any of them is rejected by the parser instead
/// of producing a partially filled question.
#[derive(Debug, Clone)]
pub struct Question {
    pub text: String,
    pub options: [String; 4],
    pub correct: Letter,
    pub raw_response: String,
}

impl Question {
    pub fn option(&self, letter: Letter) -> &str {
        &self.options[letter.index()]
    }
}

/// One answered question, recorded at submission time. Entries are append
/// only; the summary and the exporters read them but never modify them.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub question: String,
    pub options: [String; 4],
    pub chosen: Letter,
    pub correct: Letter,
    pub feedback: String,
}

/// Requests and replies are tagged with a process-unique request id so a
/// reply can always be matched to the request that produced it; a session
/// drops any reply whose id is not its outstanding request.
#[derive(Debug)]
pub enum GenRequest {
    Generate {
        request_id: u64,
        document_text: String,
    },
}

#[derive(Debug)]
pub enum GenResponse {
    Generated { request_id: u64, raw: String },
    Error { request_id: u64, error: String },
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Quiz,
    Summary,
}
