use anyhow::Result;

use crate::ArchiveName;

use super::super::{Container, HistoryView};

pub struct NewChatController<'a> {
    container: &'a Container,
}

impl<'a> NewChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn new_chat(&self) -> Result<String> {
        let mut session = self.container.history_session().await;
        session.new_chat(ArchiveName::now()).await;

        let notices = session.take_notices();
        Ok(HistoryView::new(None).render_notices(&notices))
    }
}
