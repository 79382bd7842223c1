//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the accounting core.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;

        db.execute_unprepared(CONTACTS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_LINES_SQL).await?;
        db.execute_unprepared(INVOICE_SEQUENCES_SQL).await?;

        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(ALLOCATIONS_SQL).await?;

        db.execute_unprepared(INVOICE_INTEREST_SQL).await?;

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
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'income',
    'expense'
);

CREATE TYPE system_tag AS ENUM (
    'cash',
    'accounts_receivable',
    'accounts_payable',
    'sales_revenue',
    'purchase_expense',
    'tax_payable'
);

CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'void');

CREATE TYPE invoice_type AS ENUM ('sales', 'purchase');

CREATE TYPE invoice_status AS ENUM (
    'draft',
    'sent',
    'partially_paid',
    'paid',
    'void'
);

CREATE TYPE payment_direction AS ENUM ('received', 'made');

CREATE TYPE contact_kind AS ENUM ('customer', 'supplier', 'both');
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    kind contact_kind NOT NULL,
    email VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_contacts_tenant ON contacts(tenant_id);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    code VARCHAR(32) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    system_tag system_tag,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_tenant_code UNIQUE (tenant_id, code)
);

CREATE INDEX idx_accounts_tenant ON accounts(tenant_id);
CREATE INDEX idx_accounts_tenant_tag ON accounts(tenant_id, system_tag)
    WHERE system_tag IS NOT NULL;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    entry_date DATE NOT NULL,
    memo TEXT,
    status entry_status NOT NULL DEFAULT 'posted',
    reversal_of UUID REFERENCES journal_entries(id),
    reversed_by UUID REFERENCES journal_entries(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journal_entries_tenant ON journal_entries(tenant_id);
CREATE INDEX idx_journal_entries_tenant_date ON journal_entries(tenant_id, entry_date);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit DECIMAL(19, 4) NOT NULL DEFAULT 0,
    credit DECIMAL(19, 4) NOT NULL DEFAULT 0,
    memo TEXT,

    -- exactly one positive side per line
    CONSTRAINT chk_journal_lines_one_side CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    )
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    invoice_type invoice_type NOT NULL,
    number VARCHAR(32) NOT NULL,
    contact_id UUID NOT NULL REFERENCES contacts(id),
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    status invoice_status NOT NULL DEFAULT 'draft',
    subtotal DECIMAL(19, 4) NOT NULL,
    tax DECIMAL(19, 4) NOT NULL,
    total DECIMAL(19, 4) NOT NULL,
    amount_paid DECIMAL(19, 4) NOT NULL DEFAULT 0,
    journal_entry_id UUID REFERENCES journal_entries(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_invoices_tenant_number UNIQUE (tenant_id, number),
    CONSTRAINT chk_invoices_paid_within_total CHECK (
        amount_paid >= 0 AND amount_paid <= total
    )
);

CREATE INDEX idx_invoices_tenant ON invoices(tenant_id);
CREATE INDEX idx_invoices_tenant_status ON invoices(tenant_id, status);
CREATE INDEX idx_invoices_tenant_contact ON invoices(tenant_id, contact_id);
";

const INVOICE_LINES_SQL: &str = r"
CREATE TABLE invoice_lines (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    description TEXT NOT NULL,
    quantity DECIMAL(19, 4) NOT NULL,
    unit_price DECIMAL(19, 4) NOT NULL,
    tax_rate DECIMAL(9, 6) NOT NULL DEFAULT 0,
    line_subtotal DECIMAL(19, 4) NOT NULL,
    line_tax DECIMAL(19, 4) NOT NULL,

    CONSTRAINT chk_invoice_lines_quantity CHECK (quantity > 0),
    CONSTRAINT chk_invoice_lines_price CHECK (unit_price >= 0),
    CONSTRAINT chk_invoice_lines_tax_rate CHECK (tax_rate >= 0)
);

CREATE INDEX idx_invoice_lines_invoice ON invoice_lines(invoice_id);
";

const INVOICE_SEQUENCES_SQL: &str = r"
CREATE TABLE invoice_sequences (
    tenant_id UUID NOT NULL,
    invoice_type invoice_type NOT NULL,
    next_number BIGINT NOT NULL DEFAULT 1,

    PRIMARY KEY (tenant_id, invoice_type)
);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    direction payment_direction NOT NULL,
    contact_id UUID NOT NULL REFERENCES contacts(id),
    amount DECIMAL(19, 4) NOT NULL,
    payment_date DATE NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payments_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payments_tenant ON payments(tenant_id);
CREATE INDEX idx_payments_tenant_date ON payments(tenant_id, payment_date);
";

const ALLOCATIONS_SQL: &str = r"
CREATE TABLE allocations (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    payment_id UUID NOT NULL REFERENCES payments(id),
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    amount DECIMAL(19, 4) NOT NULL,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_allocations_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_allocations_payment ON allocations(payment_id);
CREATE INDEX idx_allocations_invoice ON allocations(invoice_id);
";

const INVOICE_INTEREST_SQL: &str = r"
CREATE TABLE invoice_interest (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL,
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    calculated_on DATE NOT NULL,
    principal DECIMAL(19, 4) NOT NULL,
    days_overdue BIGINT NOT NULL,
    daily_rate DECIMAL(9, 6) NOT NULL,
    interest DECIMAL(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_invoice_interest_invoice ON invoice_interest(invoice_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS invoice_interest CASCADE;
DROP TABLE IF EXISTS allocations CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS invoice_sequences CASCADE;
DROP TABLE IF EXISTS invoice_lines CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS contacts CASCADE;

DROP TYPE IF EXISTS contact_kind;
DROP TYPE IF EXISTS payment_direction;
DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS invoice_type;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS system_tag;
DROP TYPE IF EXISTS account_type;
";
