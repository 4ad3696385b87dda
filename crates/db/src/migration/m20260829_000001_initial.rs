//! Initial database migration.
//!
//! Creates the enums, account tables, the maintenance ledger, and expenses.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNT TABLES
        // ============================================================
        db.execute_unprepared(APARTMENTS_SQL).await?;
        db.execute_unprepared(MEMBERS_SQL).await?;

        // ============================================================
        // PART 3: MAINTENANCE LEDGER
        // ============================================================
        db.execute_unprepared(MAINTENANCE_CHARGES_SQL).await?;

        // ============================================================
        // PART 4: EXPENSES
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Apartment / member account lifecycle
CREATE TYPE account_status AS ENUM ('active', 'inactive');

-- Maintenance charge settlement status
CREATE TYPE payment_status AS ENUM ('paid', 'partial', 'due');
";

const APARTMENTS_SQL: &str = r"
CREATE TABLE apartments (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    contact VARCHAR(50) NOT NULL,
    address TEXT NOT NULL,
    status account_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_apartments_email ON apartments(email);
";

const MEMBERS_SQL: &str = r"
CREATE TABLE members (
    id UUID PRIMARY KEY,
    apartment_id UUID NOT NULL REFERENCES apartments(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    contact VARCHAR(50) NOT NULL,
    address TEXT NOT NULL,
    image_url TEXT,
    status account_status NOT NULL DEFAULT 'active',
    maintenance_rate NUMERIC(14, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_members_rate_non_negative CHECK (maintenance_rate >= 0)
);

CREATE INDEX idx_members_apartment ON members(apartment_id);
CREATE INDEX idx_members_email ON members(email);
";

const MAINTENANCE_CHARGES_SQL: &str = r"
CREATE TABLE maintenance_charges (
    id UUID PRIMARY KEY,
    apartment_id UUID NOT NULL REFERENCES apartments(id) ON DELETE CASCADE,
    member_id UUID NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    -- YYYY-MM, so lexicographic comparisons follow calendar order
    period CHAR(7) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    carry_forward NUMERIC(14, 2) NOT NULL DEFAULT 0,
    paid_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    dues NUMERIC(14, 2) NOT NULL DEFAULT 0,
    status payment_status NOT NULL DEFAULT 'due',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_maintenance_member_period UNIQUE (member_id, period),
    CONSTRAINT chk_maintenance_period_format CHECK (period ~ '^\d{4}-(0[1-9]|1[0-2])$')
);

CREATE INDEX idx_maintenance_apartment ON maintenance_charges(apartment_id);
CREATE INDEX idx_maintenance_member_period ON maintenance_charges(member_id, period DESC);
CREATE INDEX idx_maintenance_created ON maintenance_charges(created_at DESC);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    apartment_id UUID NOT NULL REFERENCES apartments(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    spent_on DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_expenses_amount_non_negative CHECK (amount >= 0)
);

CREATE INDEX idx_expenses_apartment ON expenses(apartment_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS maintenance_charges;
DROP TABLE IF EXISTS members;
DROP TABLE IF EXISTS apartments;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS account_status;
";
