use crate::core::error::{Error, Result};
use crate::utils::is_affirmative;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Asks the user for yes/no confirmation.
#[async_trait]
pub trait Prompter: Send {
    async fn confirm(&mut self, question: &str) -> Result<bool>;
}

#[async_trait]
impl<P: Prompter + ?Sized> Prompter for Box<P> {
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        (**self).confirm(question).await
    }
}

#[async_trait]
impl<'a, P: Prompter + ?Sized> Prompter for &'a mut P {
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        (**self).confirm(question).await
    }
}

/// Interactive prompts, answered line by line from standard input unless
/// another reader is supplied.
pub struct StdinPrompter<R = BufReader<Stdin>> {
    reader: R,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> StdinPrompter<R> {
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Print `prompt` and read one line. `None` on end of input.
    pub async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush().map_err(Error::Prompt)?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(Error::Prompt)?;

        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }

    pub async fn read_url_line(&mut self) -> Result<String> {
        let line = self
            .ask("Enter the URLs of the YouTube videos or playlists separated by commas: ")
            .await?;
        Ok(line.unwrap_or_default())
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Prompter for StdinPrompter<R> {
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} (y/n): ", question)).await?;
        Ok(answer.as_deref().map(is_affirmative).unwrap_or(false))
    }
}

/// Answers yes to everything, for `--yes`.
pub struct AutoConfirm;

#[async_trait]
impl Prompter for AutoConfirm {
    async fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(true)
    }
}
