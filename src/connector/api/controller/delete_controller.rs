use anyhow::Result;

use super::super::{Container, HistoryView};

pub struct DeleteController<'a> {
    container: &'a Container,
}

impl<'a> DeleteController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn delete(&self) -> Result<String> {
        let mut session = self.container.history_session().await;
        session.delete_chat().await;

        let notices = session.take_notices();
        Ok(HistoryView::new(None).render_notices(&notices))
    }
}
