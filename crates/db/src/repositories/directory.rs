//! Read-only lookups over reference data owned by other systems.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{debtors, employees, expense_categories, operators};
use crate::error::RepositoryError;

/// Directory of operators, debtors, employees and expense categories.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    db: DatabaseConnection,
}

impl DirectoryRepository {
    /// Creates a new directory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets an operator by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the operator does not exist.
    pub async fn get_operator(&self, id: Uuid) -> Result<operators::Model, RepositoryError> {
        operators::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("operator", id))
    }

    /// Lists active operators by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_operators(&self) -> Result<Vec<operators::Model>, RepositoryError> {
        Ok(operators::Entity::find()
            .filter(operators::Column::Active.eq(true))
            .order_by_asc(operators::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Gets a debtor by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the debtor does not exist.
    pub async fn get_debtor(&self, id: Uuid) -> Result<debtors::Model, RepositoryError> {
        debtors::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("debtor", id))
    }

    /// Lists debtors by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_debtors(&self) -> Result<Vec<debtors::Model>, RepositoryError> {
        Ok(debtors::Entity::find()
            .order_by_asc(debtors::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Gets an employee by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub async fn get_employee(&self, id: Uuid) -> Result<employees::Model, RepositoryError> {
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("employee", id))
    }

    /// Lists active employees by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_employees(&self) -> Result<Vec<employees::Model>, RepositoryError> {
        Ok(employees::Entity::find()
            .filter(employees::Column::Active.eq(true))
            .order_by_asc(employees::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Lists expense categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_expense_categories(
        &self,
    ) -> Result<Vec<expense_categories::Model>, RepositoryError> {
        Ok(expense_categories::Entity::find()
            .order_by_asc(expense_categories::Column::Name)
            .all(&self.db)
            .await?)
    }
}
