// Contest, entry and vote persistence

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;

use crate::db::error::DbError;
use crate::entity::prelude::{ContestEntries, Contests, Votes};
use crate::entity::{contest_entries, contests, votes};

pub const CONTEST_ACTIVE: &str = "active";
pub const CONTEST_CLOSED: &str = "closed";

/// Contest row as requested by its creator
#[derive(Debug, Clone)]
pub struct NewContest {
    pub creator_id: i32,
    pub title: String,
    pub description: String,
    pub contest_type: String,
    pub entry_fee_cents: i64,
    pub platform_fee_bp: i32,
    pub chain: String,
    pub ends_at: DateTime<Utc>,
}

/// Entries of a closed contest with the votes each one received
#[derive(Debug, Clone)]
pub struct ClosedContest {
    pub contest: contests::Model,
    pub entries: Vec<contest_entries::Model>,
    pub vote_counts: HashMap<i32, i64>,
}

/// Repository for contests, their entries and votes
pub struct ContestRepository {
    conn: DatabaseConnection,
}

impl ContestRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts an active contest with an empty pot
    pub async fn insert(&self, new_contest: NewContest) -> Result<contests::Model, DbError> {
        contests::ActiveModel {
            creator_id: Set(new_contest.creator_id),
            title: Set(new_contest.title),
            description: Set(new_contest.description),
            contest_type: Set(new_contest.contest_type),
            entry_fee_cents: Set(new_contest.entry_fee_cents),
            platform_fee_bp: Set(new_contest.platform_fee_bp),
            status: Set(CONTEST_ACTIVE.to_string()),
            total_pot_cents: Set(0),
            chain: Set(new_contest.chain),
            created_at: Set(Utc::now()),
            ends_at: Set(new_contest.ends_at),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<contests::Model>, DbError> {
        Contests::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Contests in the given status, newest first
    pub async fn list_by_status(&self, status: &str) -> Result<Vec<contests::Model>, DbError> {
        Contests::find()
            .filter(contests::Column::Status.eq(status))
            .order_by_desc(contests::Column::CreatedAt)
            .order_by_desc(contests::Column::Id)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Number of entries per contest (single grouped query)
    pub async fn entry_counts(&self, contest_ids: &[i32]) -> Result<HashMap<i32, i64>, DbError> {
        if contest_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(FromQueryResult)]
        struct Row {
            contest_id: i32,
            entry_count: i64,
        }

        let rows = ContestEntries::find()
            .select_only()
            .column(contest_entries::Column::ContestId)
            .column_as(Expr::col(contest_entries::Column::Id).count(), "entry_count")
            .filter(contest_entries::Column::ContestId.is_in(contest_ids.to_vec()))
            .group_by(contest_entries::Column::ContestId)
            .into_model::<Row>()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.contest_id, r.entry_count))
            .collect())
    }

    pub async fn find_entry(&self, entry_id: i32) -> Result<Option<contest_entries::Model>, DbError> {
        ContestEntries::find_by_id(entry_id)
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Entry funded by a payment, if any
    pub async fn find_entry_by_payment(
        &self,
        payment_id: i32,
    ) -> Result<Option<contest_entries::Model>, DbError> {
        ContestEntries::find()
            .filter(contest_entries::Column::PaymentId.eq(payment_id))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn has_entry(&self, contest_id: i32, user_id: i32) -> Result<bool, DbError> {
        let count = ContestEntries::find()
            .filter(contest_entries::Column::ContestId.eq(contest_id))
            .filter(contest_entries::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Entries of a contest, newest first
    pub async fn entries_for_contest(
        &self,
        contest_id: i32,
    ) -> Result<Vec<contest_entries::Model>, DbError> {
        ContestEntries::find()
            .filter(contest_entries::Column::ContestId.eq(contest_id))
            .order_by_desc(contest_entries::Column::CreatedAt)
            .order_by_desc(contest_entries::Column::Id)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Votes per entry of a contest. Entries without votes are absent from the map.
    pub async fn vote_counts(&self, contest_id: i32) -> Result<HashMap<i32, i64>, DbError> {
        tally_votes(&self.conn, contest_id).await.map_err(Into::into)
    }

    /// Votes per entry for an arbitrary set of entries (single grouped query)
    pub async fn vote_counts_for_entries(
        &self,
        entry_ids: &[i32],
    ) -> Result<HashMap<i32, i64>, DbError> {
        if entry_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(FromQueryResult)]
        struct Row {
            entry_id: i32,
            vote_count: i64,
        }

        let rows = Votes::find()
            .select_only()
            .column(votes::Column::EntryId)
            .column_as(Expr::col(votes::Column::Id).count(), "vote_count")
            .filter(votes::Column::EntryId.is_in(entry_ids.to_vec()))
            .group_by(votes::Column::EntryId)
            .into_model::<Row>()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|r| (r.entry_id, r.vote_count)).collect())
    }

    pub async fn has_voted(&self, contest_id: i32, voter_id: i32) -> Result<bool, DbError> {
        let count = Votes::find()
            .filter(votes::Column::ContestId.eq(contest_id))
            .filter(votes::Column::VoterId.eq(voter_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Records a vote. A second vote by the same voter fails with `DbError::Conflict`.
    pub async fn insert_vote(
        &self,
        contest_id: i32,
        voter_id: i32,
        entry_id: i32,
    ) -> Result<votes::Model, DbError> {
        votes::ActiveModel {
            contest_id: Set(contest_id),
            voter_id: Set(voter_id),
            entry_id: Set(entry_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    /// Adds an entry and its fee to the pot in one transaction.
    ///
    /// The pot only grows while the contest is still active. Returns `None` and
    /// rolls the entry back when the contest was closed in the meantime. A
    /// second entry by the same user, or a second entry funded by the same
    /// payment, fails with `DbError::Conflict`.
    pub async fn insert_entry_and_fund_pot(
        &self,
        contest_id: i32,
        user_id: i32,
        payment_id: i32,
        content_type: String,
        content: String,
        fee_cents: i64,
    ) -> Result<Option<contest_entries::Model>, DbError> {
        let txn = self.conn.begin().await?;

        let entry = contest_entries::ActiveModel {
            contest_id: Set(contest_id),
            user_id: Set(user_id),
            payment_id: Set(payment_id),
            content_type: Set(content_type),
            content: Set(content),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let funded = Contests::update_many()
            .col_expr(
                contests::Column::TotalPotCents,
                Expr::col(contests::Column::TotalPotCents).add(fee_cents),
            )
            .filter(contests::Column::Id.eq(contest_id))
            .filter(contests::Column::Status.eq(CONTEST_ACTIVE))
            .exec(&txn)
            .await?;

        if funded.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;
        Ok(Some(entry))
    }

    /// Closes an active contest and returns the tally it was closed with.
    ///
    /// The status flip is conditional on `active`, so only one closer wins.
    /// Returns `None` when the contest was not active.
    pub async fn close_with_tally(
        &self,
        contest_id: i32,
    ) -> Result<Option<ClosedContest>, DbError> {
        let txn = self.conn.begin().await?;

        let closed = Contests::update_many()
            .col_expr(contests::Column::Status, Expr::value(CONTEST_CLOSED))
            .filter(contests::Column::Id.eq(contest_id))
            .filter(contests::Column::Status.eq(CONTEST_ACTIVE))
            .exec(&txn)
            .await?;

        if closed.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let contest = Contests::find_by_id(contest_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("contest {}", contest_id)))?;

        let entries = ContestEntries::find()
            .filter(contest_entries::Column::ContestId.eq(contest_id))
            .order_by_asc(contest_entries::Column::CreatedAt)
            .order_by_asc(contest_entries::Column::Id)
            .all(&txn)
            .await?;

        let vote_counts = tally_votes(&txn, contest_id).await?;

        txn.commit().await?;
        Ok(Some(ClosedContest {
            contest,
            entries,
            vote_counts,
        }))
    }

    pub async fn count_created_by(&self, creator_id: i32) -> Result<u64, DbError> {
        Contests::find()
            .filter(contests::Column::CreatorId.eq(creator_id))
            .count(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Every entry the user submitted, newest first
    pub async fn entries_by_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<contest_entries::Model>, DbError> {
        ContestEntries::find()
            .filter(contest_entries::Column::UserId.eq(user_id))
            .order_by_desc(contest_entries::Column::CreatedAt)
            .order_by_desc(contest_entries::Column::Id)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_many(&self, ids: &[i32]) -> Result<Vec<contests::Model>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Contests::find()
            .filter(contests::Column::Id.is_in(ids.to_vec()))
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }
}

async fn tally_votes<C: ConnectionTrait>(
    conn: &C,
    contest_id: i32,
) -> Result<HashMap<i32, i64>, DbErr> {
    #[derive(FromQueryResult)]
    struct Row {
        entry_id: i32,
        vote_count: i64,
    }

    let rows = Votes::find()
        .select_only()
        .column(votes::Column::EntryId)
        .column_as(Expr::col(votes::Column::Id).count(), "vote_count")
        .filter(votes::Column::ContestId.eq(contest_id))
        .group_by(votes::Column::EntryId)
        .into_model::<Row>()
        .all(conn)
        .await?;

    Ok(rows.into_iter().map(|r| (r.entry_id, r.vote_count)).collect())
}
