use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::shared::core::primitives::{ItemId, Timestamp, UserId};
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlReadTimestamp {
    pub item_id: ID,
    pub last_read_at: Timestamp,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn last_read_timestamps(
        &self,
        context: &Context<'_>,
        item_ids: Vec<ID>,
    ) -> GqlResult<Vec<GqlReadTimestamp>> {
        let user_id = context
            .data_opt::<UserId>()
            .ok_or_else(|| async_graphql::Error::new("anonymous users have no read history"))?;
        let state = context.data_unchecked::<AppState>();

        let item_ids: Vec<ItemId> = item_ids.into_iter().map(|id| ItemId::new(id.0)).collect();
        let reads = state
            .lookup_read_timestamps
            .handle(user_id, &item_ids)
            .await?;

        let mut list: Vec<GqlReadTimestamp> = reads
            .into_iter()
            .map(|(item_id, last_read_at)| GqlReadTimestamp {
                item_id: ID(item_id.to_string()),
                last_read_at,
            })
            .collect();
        list.sort_by(|a, b| a.item_id.0.cmp(&b.item_id.0));
        Ok(list)
    }
}
