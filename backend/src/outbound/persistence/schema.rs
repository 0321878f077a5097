//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, update this file to match
//! (or regenerate with `diesel print-schema`).

diesel::table! {
    /// User accounts.
    ///
    /// Access is passwordless: accounts are registered by administrators and
    /// login happens via one-time email codes. `email` is unique.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login address, stored lowercased.
        email -> Varchar,
        /// Access role: `user` or `admin`.
        role -> Varchar,
        /// Deactivated accounts cannot request codes or log in.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One-time login codes.
    ///
    /// The code digits are never stored; `fingerprint` holds a SHA-256 hex
    /// digest. Rows are single-use and expire ten minutes after issue.
    verification_codes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Address the code was issued for.
        email -> Varchar,
        /// SHA-256 hex digest of the code digits.
        fingerprint -> Varchar,
        /// Hard expiry; the code is dead afterwards even if unused.
        expires_at -> Timestamptz,
        /// Set once the code has been exchanged for a session.
        used -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Equipment categories. `name` is unique.
    categories (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique display name.
        name -> Varchar,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked equipment.
    ///
    /// `serial_code` and `product_code` are unique. The assignment column is
    /// nullable denormalised state; the authoritative history lives in
    /// `inventory_assignments`.
    inventory (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        product_name -> Varchar,
        /// Manufacturer, when known.
        brand -> Nullable<Varchar>,
        /// Model designation, when known.
        model -> Nullable<Varchar>,
        /// Unique manufacturer serial code.
        serial_code -> Varchar,
        /// Unique internal product code.
        product_code -> Varchar,
        /// Current holder's email, if assigned.
        assigned_user_email -> Nullable<Varchar>,
        /// Category reference; nulled when the category is deleted.
        category_id -> Nullable<Uuid>,
        /// Physical location note.
        location -> Nullable<Varchar>,
        /// Free-form remarks.
        notes -> Nullable<Text>,
        /// Purchase date, when recorded.
        purchase_date -> Nullable<Date>,
        /// Warranty expiry, when recorded.
        warranty_end_date -> Nullable<Date>,
        /// When the current assignment began.
        assignment_date -> Nullable<Timestamptz>,
        /// When the item was last unassigned.
        unassignment_date -> Nullable<Timestamptz>,
        /// Operational status string.
        status -> Varchar,
        /// Administrator who registered the item.
        added_by_email -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only assignment history.
    ///
    /// Unassignment stamps `unassigned_at` on the open record; rows are
    /// never deleted, even when the item or user goes away.
    inventory_assignments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The item that changed hands.
        inventory_id -> Uuid,
        /// The user the item was assigned to.
        user_email -> Varchar,
        /// When the assignment began.
        assigned_at -> Timestamptz,
        /// When the assignment ended; null while open.
        unassigned_at -> Nullable<Timestamptz>,
        /// Context note, e.g. `initial assignment`.
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Helpdesk tickets.
    tickets (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Reporting user's email.
        user_email -> Varchar,
        /// Ticket kind: `fault`, `count`, `change`, or `general`.
        kind -> Varchar,
        /// The affected item, when the ticket concerns one.
        inventory_id -> Nullable<Uuid>,
        /// One-line summary of the problem.
        title -> Varchar,
        /// Problem description.
        description -> Text,
        /// Urgency: `low`, `normal`, `high`, or `urgent`.
        priority -> Varchar,
        /// Workflow status: `open`, `in_progress`, or `closed`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Administrator-defined counting windows.
    count_periods (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name.
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// First day counting is permitted.
        start_date -> Date,
        /// Last day counting is permitted (inclusive).
        end_date -> Date,
        /// Lifecycle status: `active`, `completed`, or `cancelled`.
        status -> Varchar,
        /// Administrator who opened the period.
        created_by -> Varchar,
        /// Creation timestamp; recency resolves active-period ambiguity.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Count submissions, one per (user, period) pair.
    ///
    /// `period_id` deliberately carries no foreign key: submissions survive
    /// the deletion of their period. The sheet is opaque JSON keyed by item
    /// identifier strings.
    count_submissions (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user's email.
        user_email -> Varchar,
        /// Owning period; unique together with `user_email`.
        period_id -> Uuid,
        /// The count payload.
        sheet -> Jsonb,
        /// Lifecycle status: `draft` or `submitted`.
        status -> Varchar,
        /// Set when the submission became final.
        submitted_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(inventory -> categories (category_id));
diesel::joinable!(tickets -> inventory (inventory_id));
diesel::joinable!(inventory_assignments -> inventory (inventory_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    verification_codes,
    categories,
    inventory,
    inventory_assignments,
    tickets,
    count_periods,
    count_submissions,
);
