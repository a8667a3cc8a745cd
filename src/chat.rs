use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use rand::Rng;

use crate::compose::compose;
use crate::config::TypingDelay;
use crate::intent::Classifier;
use crate::stats::StatsDocument;

/// The six canned questions offered as quick buttons.
pub const QUICK_QUESTIONS: [&str; 6] = [
    "¿Cuántos goles marcaste?",
    "¿Cuántos títulos ganaste?",
    "¿Cuántos Balones de Oro tenés?",
    "¿Ganaste el Mundial?",
    "¿En qué equipos jugaste?",
    "¿Cuáles son tus récords?",
];

pub const WELCOME: &str =
    "¡Hola! Soy el bot de Messi ⚽ Preguntame lo que quieras sobre mi carrera.";

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone)]
pub enum StatsState {
    Loading,
    Ready(StatsDocument),
    Failed(String),
}

impl StatsState {
    pub fn document(&self) -> Option<&StatsDocument> {
        match self {
            StatsState::Ready(doc) => Some(doc),
            StatsState::Loading | StatsState::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: Speaker,
    pub text: String,
}

/// One chat session: the read-only stats snapshot, the injected random source and the
/// turns exchanged so far. Nothing outlives the session.
pub struct ChatSession<R: Rng> {
    classifier: Classifier,
    stats: StatsState,
    rng: R,
    typing: TypingDelay,
    transcript: Vec<ChatMessage>,
    logs: VecDeque<String>,
}

impl<R: Rng> ChatSession<R> {
    pub fn new(rng: R) -> Self {
        Self {
            classifier: Classifier::default(),
            stats: StatsState::Loading,
            rng,
            typing: TypingDelay::default(),
            transcript: vec![ChatMessage {
                from: Speaker::Bot,
                text: WELCOME.to_string(),
            }],
            logs: VecDeque::new(),
        }
    }

    pub fn with_stats(doc: StatsDocument, rng: R) -> Self {
        let mut session = Self::new(rng);
        session.set_stats(Ok(doc));
        session
    }

    pub fn with_typing(mut self, typing: TypingDelay) -> Self {
        self.typing = typing;
        self
    }

    /// Installs the outcome of the one-time load. Team aliases are rebuilt from the document
    /// and the totals are checked against the per-team sums.
    pub fn set_stats(&mut self, loaded: Result<StatsDocument>) {
        match loaded {
            Ok(doc) => {
                self.push_log(format!(
                    "[INFO] Stats loaded: {} teams (updated {})",
                    doc.teams.len(),
                    doc.last_updated.as_deref().unwrap_or("unknown")
                ));
                for mismatch in doc.totals_mismatches() {
                    self.push_log(format!(
                        "[WARN] career_totals.{} = {} but teams sum to {}",
                        mismatch.field.label(),
                        mismatch.career,
                        mismatch.team_sum
                    ));
                }
                self.classifier = Classifier::for_document(&doc);
                self.stats = StatsState::Ready(doc);
            }
            Err(err) => {
                self.push_log(format!("[WARN] Stats load failed: {err:#}"));
                self.stats = StatsState::Failed(format!("{err:#}"));
            }
        }
    }

    pub fn stats_state(&self) -> &StatsState {
        &self.stats
    }

    pub fn stats(&self) -> Option<&StatsDocument> {
        self.stats.document()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Classifies and answers one message, recording both turns.
    pub fn reply(&mut self, text: &str, today: NaiveDate) -> String {
        let analysis = self.classifier.classify(text);
        self.push_log(format!(
            "[INFO] intent={} team={} year={}",
            analysis.intent.map(|t| t.name()).unwrap_or("-"),
            analysis.team.as_deref().unwrap_or("-"),
            analysis
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
        let answer = compose(&analysis, self.stats.document(), today, &mut self.rng);
        self.transcript.push(ChatMessage {
            from: Speaker::User,
            text: text.to_string(),
        });
        self.transcript.push(ChatMessage {
            from: Speaker::Bot,
            text: answer.clone(),
        });
        answer
    }

    /// Simulated typing latency shown before a reply. Carries no meaning.
    pub fn typing_delay(&mut self) -> Duration {
        let jitter = if self.typing.jitter_ms == 0 {
            0
        } else {
            self.rng.gen_range(0..=self.typing.jitter_ms)
        };
        Duration::from_millis(self.typing.base_ms + jitter)
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn logs(&self) -> &VecDeque<String> {
        &self.logs
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
