//! Opaque token-stream source behind `/streamAi`.
//!
//! Text generation is an external collaborator; all the producer cares
//! about is a stream of word tokens it can forward and cut short. The
//! [`TokenSource`] trait keeps that seam, and [`CannedLecture`] fills it
//! with a fixed lecture delivered at a configurable pace so the endpoint
//! works without any generation backend.

use futures::stream::BoxStream;
use std::time::Duration;
use tokio::time::sleep;

/// The prompt the endpoint streams an answer to.
pub const LECTURE_PROMPT: &str = "Explain the concept of AI, in as much detail as possible. \
    Imagine you are a teacher who needs to fill an hour of lecture time. \
    Include examples and theoretical ramblings.";

const LECTURE: &str = "Artificial intelligence is the study of systems that perform tasks \
    we would otherwise credit to human judgment: recognizing a face, translating a sentence, \
    planning a route, or deciding which move wins a game. The field began with symbolic \
    reasoning, where knowledge was written down as rules and a program searched for \
    conclusions. Search itself is the oldest example: a chess engine considers moves, then \
    replies to moves, pruning branches that cannot matter. Later came statistical learning, \
    which replaces hand-written rules with parameters fitted to data. A spam filter is the \
    classic case: nobody writes down what spam looks like, the classifier estimates it from \
    labeled examples. Neural networks extend this idea by stacking many simple functions and \
    adjusting millions of weights, and with enough data and compute they learn \
    representations nobody designed. Theoretically this raises old questions in new clothes. \
    What does it mean to generalize beyond the training data? Why do heavily \
    over-parameterized models fail to overfit in the way classical theory predicts? There \
    is also the matter of specification: a system optimizes the objective it is given, not \
    the one we intended, and the gap between the two is where most practical trouble lives. \
    For an hour-long treatment we would continue with the history of expert systems, the \
    winters that followed them, and why sequence models changed the economics of the field \
    entirely.";

/// A producer of word tokens for a prompt. Implementations decide where
/// the words come from; callers only forward them.
pub trait TokenSource: Send + Sync {
    /// Stream of tokens answering `prompt`, each one ready to append to a
    /// text body as-is.
    fn generate(&self, prompt: &str) -> BoxStream<'static, String>;
}

/// Default [`TokenSource`]: replays a fixed lecture word by word, pausing
/// `pace` between words.
#[derive(Debug, Clone)]
pub struct CannedLecture {
    pace: Duration,
}

impl CannedLecture {
    /// A lecture delivered one word per `pace`.
    #[must_use]
    pub const fn new(pace: Duration) -> Self {
        Self { pace }
    }
}

impl TokenSource for CannedLecture {
    fn generate(&self, prompt: &str) -> BoxStream<'static, String> {
        tracing::debug!(prompt_len = prompt.len(), "starting canned lecture");
        let pace = self.pace;
        let words: Vec<String> = LECTURE
            .split_whitespace()
            .map(|word| format!("{word} "))
            .collect();
        Box::pin(async_stream::stream! {
            for word in words {
                yield word;
                sleep(pace).await;
            }
        })
    }
}
