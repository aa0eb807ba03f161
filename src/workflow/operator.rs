use async_trait::async_trait;

/// How a line should stand out on the operator's screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    /// Rejected answer, the question is asked again.
    Warning,
    Error,
    Success,
    /// Needs manual action on the exchange.
    Alert,
}

/// Line-oriented prompt/report channel to the person running the bot.
#[async_trait]
pub trait Operator: Send {
    /// Waits for the answer to `question`. Closed input is an error.
    async fn ask(&mut self, question: &str) -> std::io::Result<String>;

    fn tell(&mut self, tone: Tone, line: &str);
}
