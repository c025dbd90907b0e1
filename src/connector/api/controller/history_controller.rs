use anyhow::{bail, Result};

use super::super::{Container, HistoryView};

pub struct HistoryController<'a> {
    container: &'a Container,
}

impl<'a> HistoryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn history(&self, last: Option<usize>) -> Result<String> {
        if last == Some(0) {
            bail!("--last must be at least 1");
        }

        let mut session = self.container.history_session().await;
        let view = HistoryView::new(last);

        let notices = session.take_notices();
        let mut output = String::new();
        if !notices.is_empty() {
            output.push_str(&view.render_notices(&notices));
            output.push_str("\n\n");
        }
        output.push_str(&view.render(session.history()));
        Ok(output)
    }
}
