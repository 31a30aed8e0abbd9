use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Customer;
use crate::db::DatabaseError;

pub struct CustomerRepository;

impl CustomerRepository {
    pub async fn find(pool: &PgPool, customer_id: Uuid) -> Result<Option<Customer>, DatabaseError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(pool)
            .await?;
        Ok(customer)
    }
}
