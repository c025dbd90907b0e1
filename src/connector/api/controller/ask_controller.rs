use anyhow::Result;

use super::super::{busy_indicator, Container, HistoryView};

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// One exchange: the reply is printed and both messages join the history.
    pub async fn ask(&self, prompt: String) -> Result<String> {
        let mut session = self.container.session().await?;
        let view = HistoryView::new(None);

        let pending = session.submit(&prompt).await?;
        let spinner = busy_indicator();
        let outcome = pending.wait().await;
        spinner.finish_and_clear();
        let reply = session.resolve(outcome).await;

        let notices = session.take_notices();
        let mut output = String::new();
        if !notices.is_empty() {
            output.push_str(&view.render_notices(&notices));
            output.push('\n');
        }
        output.push_str(&view.render_message(&reply));
        Ok(output)
    }
}
