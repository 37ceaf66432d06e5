//! Remote word feed plumbing
//!
//! The spawner never waits on a word source. It hands the source a
//! [`WordTicket`] and carries on; the source answers through the ticket
//! whenever it is ready, from any thread.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Why a word request produced nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordSourceError {
    #[error("word source unavailable: {0}")]
    Unavailable(String),
    #[error("word source returned no usable words")]
    Empty,
}

/// Answer to one word request
#[derive(Debug)]
pub struct WordBatch {
    /// Run generation the request was made in
    pub generation: u64,
    pub result: Result<Vec<String>, WordSourceError>,
}

/// Return address for a single word request
///
/// A ticket dropped without an answer reports itself as failed, so a source
/// that loses a request (worker panic, abandoned fetch) never stalls the feed.
#[derive(Debug)]
pub struct WordTicket {
    generation: u64,
    /// Taken by the first answer
    reply: Option<Sender<WordBatch>>,
}

impl WordTicket {
    pub(crate) fn new(generation: u64, reply: Sender<WordBatch>) -> Self {
        Self {
            generation,
            reply: Some(reply),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver words. Each string may hold several whitespace separated tokens.
    pub fn fulfil(mut self, words: Vec<String>) {
        self.send(Ok(words));
    }

    /// Report a failed request
    pub fn fail(mut self, err: WordSourceError) {
        self.send(Err(err));
    }

    fn send(&mut self, result: Result<Vec<String>, WordSourceError>) {
        let Some(reply) = self.reply.take() else {
            return;
        };
        let batch = WordBatch {
            generation: self.generation,
            result,
        };
        // The game may have been dropped while the request was in flight
        if reply.send(batch).is_err() {
            log::debug!(
                "Word batch for generation {} dropped: game gone",
                self.generation
            );
        }
    }
}

impl Drop for WordTicket {
    fn drop(&mut self) {
        if self.reply.is_some() {
            log::warn!(
                "Word request for generation {} dropped unanswered",
                self.generation
            );
            self.send(Err(WordSourceError::Unavailable(
                "request dropped unanswered".into(),
            )));
        }
    }
}

/// External collaborator that supplies words to type
pub trait WordSource {
    /// Start a request. Must return without blocking; answer through `ticket`.
    fn request_words(&mut self, ticket: WordTicket);
}

/// Split raw word strings into the upper-case letters to spawn, in order
pub fn letters_from_words(words: &[String]) -> impl Iterator<Item = char> + '_ {
    words
        .iter()
        .flat_map(|w| w.split_whitespace())
        .flat_map(str::chars)
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
}

/// A source with nothing to offer; play falls back to random letters
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWords;

impl WordSource for NoWords {
    fn request_words(&mut self, ticket: WordTicket) {
        ticket.fail(WordSourceError::Unavailable("no word feed configured".into()));
    }
}

/// Cycles through a fixed word list, a few words per request
#[derive(Debug, Clone)]
pub struct StaticWords {
    words: Vec<String>,
    per_request: usize,
    cursor: usize,
}

impl StaticWords {
    pub fn new(words: Vec<String>, per_request: usize) -> Self {
        Self {
            words,
            per_request: per_request.max(1),
            cursor: 0,
        }
    }

    fn take_batch(&mut self) -> Vec<String> {
        let mut batch = Vec::with_capacity(self.per_request);
        for _ in 0..self.per_request {
            batch.push(self.words[self.cursor % self.words.len()].clone());
            self.cursor = (self.cursor + 1) % self.words.len();
        }
        batch
    }
}

impl WordSource for StaticWords {
    fn request_words(&mut self, ticket: WordTicket) {
        if self.words.is_empty() {
            ticket.fail(WordSourceError::Empty);
            return;
        }
        let batch = self.take_batch();
        ticket.fulfil(batch);
    }
}

/// Answers from a background thread after a fixed latency, like a network feed
#[derive(Debug, Clone)]
pub struct ThreadedWords {
    inner: StaticWords,
    latency: Duration,
}

impl ThreadedWords {
    pub fn new(words: Vec<String>, per_request: usize, latency: Duration) -> Self {
        Self {
            inner: StaticWords::new(words, per_request),
            latency,
        }
    }
}

impl WordSource for ThreadedWords {
    fn request_words(&mut self, ticket: WordTicket) {
        if self.inner.words.is_empty() {
            ticket.fail(WordSourceError::Empty);
            return;
        }
        let batch = self.inner.take_batch();
        let latency = self.latency;
        thread::spawn(move || {
            thread::sleep(latency);
            ticket.fulfil(batch);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_letters_from_words_filters_and_uppercases() {
        let words = vec!["nebula  STAR".to_string(), "x-ray 42".to_string()];
        let letters: String = letters_from_words(&words).collect();
        assert_eq!(letters, "NEBULASTARXRAY");
    }

    #[test]
    fn test_static_words_cycle() {
        let (tx, rx) = mpsc::channel();
        let mut source = StaticWords::new(vec!["ONE".into(), "TWO".into()], 3);

        source.request_words(WordTicket::new(7, tx.clone()));
        let batch = rx.try_recv().expect("synchronous reply");
        assert_eq!(batch.generation, 7);
        assert_eq!(batch.result, Ok(vec!["ONE".into(), "TWO".into(), "ONE".into()]));

        source.request_words(WordTicket::new(7, tx));
        let batch = rx.try_recv().expect("synchronous reply");
        assert_eq!(batch.result, Ok(vec!["TWO".into(), "ONE".into(), "TWO".into()]));
    }

    #[test]
    fn test_no_words_fails() {
        let (tx, rx) = mpsc::channel();
        NoWords.request_words(WordTicket::new(1, tx));
        assert!(matches!(
            rx.try_recv().map(|b| b.result),
            Ok(Err(WordSourceError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_threaded_words_reply_later() {
        let (tx, rx) = mpsc::channel();
        let mut source = ThreadedWords::new(vec!["LATE".into()], 1, Duration::from_millis(5));
        source.request_words(WordTicket::new(3, tx));
        let batch = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("reply from worker thread");
        assert_eq!(batch.result, Ok(vec!["LATE".to_string()]));
    }

    #[test]
    fn test_ticket_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        WordTicket::new(1, tx).fulfil(vec!["GONE".into()]);
    }

    #[test]
    fn test_unanswered_ticket_reports_failure() {
        let (tx, rx) = mpsc::channel();
        drop(WordTicket::new(4, tx));
        let batch = rx.try_recv().expect("failure on drop");
        assert_eq!(batch.generation, 4);
        assert!(matches!(batch.result, Err(WordSourceError::Unavailable(_))));
    }

    #[test]
    fn test_answered_ticket_replies_once() {
        let (tx, rx) = mpsc::channel();
        WordTicket::new(2, tx).fail(WordSourceError::Empty);
        assert_eq!(rx.try_iter().count(), 1);
    }
}
