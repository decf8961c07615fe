use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::shared::core::primitives::{ItemId, Timestamp, UserId};
use crate::shell::state::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn mark_as_read(&self, context: &Context<'_>, item_id: ID) -> GqlResult<Timestamp> {
        let user_id = context
            .data_opt::<UserId>()
            .ok_or_else(|| async_graphql::Error::new("anonymous users have no read history"))?;
        let state = context.data_unchecked::<AppState>();

        state
            .record_read
            .handle(user_id, &ItemId::new(item_id.0))
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))
    }
}
