use sqlx::PgConnection;

/// A handle to a live database connection. Driven adapters borrow the underlying connection
/// from it to run queries.
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Owns (or borrows) clients for talking to systems outside the application. Business logic only
/// passes this through to driven ports, so it stays agnostic of what those systems are.
pub trait ExternalConnectivity: Send {
    type DbHandle<'cxn_borrow>: ConnectionHandle + Send
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
