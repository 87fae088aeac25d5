//! Backend route paths, relative to the API base URL.

use crate::id::CompanyId;

/// Email/password login.
pub const LOGIN: &str = "/customer/login/";

/// Account registration.
pub const REGISTER: &str = "/customer/register/";

/// The current user.
pub const CURRENT_USER: &str = "/customer/";

/// Access token refresh.
pub const TOKEN_REFRESH: &str = "/api/token/refresh/";

/// Companies visible to the current user.
pub const COMPANY_LIST: &str = "/company/list/";

/// Parties of a company (POST with company scope).
pub const PARTY_LIST: &str = "/parties/";

/// Party types.
pub const PARTY_TYPES: &str = "/parties/types/";

/// Party creation.
pub const PARTY_CREATE: &str = "/parties/create/";

/// Items of a company (POST with company scope).
pub const ITEM_LIST: &str = "/items/";

/// Item unit types.
pub const ITEM_UNITS: &str = "/items/units/";

/// Item creation.
pub const ITEM_CREATE: &str = "/items/create/";

/// Invoices of a company (POST with company scope).
pub const INVOICE_LIST: &str = "/invoice/list/";

/// Invoice types.
pub const INVOICE_TYPES: &str = "/invoice/types/";

/// Invoice creation.
pub const INVOICE_CREATE: &str = "/invoice/create/";

/// Bank accounts of a company (POST with company scope).
pub const BANK_ACCOUNTS: &str = "/invoice/bank-accounts/";

/// Payment types.
pub const PAYMENT_TYPES: &str = "/invoice/payment-types/";

/// Payments of a company (POST with company scope).
pub const PAYMENT_LIST: &str = "/payments/list/";

/// Record an incoming payment against a sales invoice.
pub const PAYMENT_IN: &str = "/payments/payment-in/";

/// Record an outgoing payment against a purchase invoice.
pub const PAYMENT_OUT: &str = "/payments/payment-out/";

/// A single company.
pub fn company(id: CompanyId) -> String {
    format!("/company/{id}/")
}

/// A single party of a company.
pub fn party(company: CompanyId, party_id: u64) -> String {
    format!("/parties/{company}/{party_id}/")
}

/// Party update.
pub fn party_update(party_id: u64) -> String {
    format!("/parties/{party_id}/update/")
}

/// A single item of a company.
pub fn item(company: CompanyId, item_id: u64) -> String {
    format!("/items/{company}/{item_id}/")
}

/// Item update.
pub fn item_update(company: CompanyId, item_id: u64) -> String {
    format!("/items/{company}/{item_id}/update/")
}

/// A single invoice.
pub fn invoice(invoice_id: u64) -> String {
    format!("/invoice/{invoice_id}/")
}

/// Invoice update.
pub fn invoice_update(invoice_id: u64) -> String {
    format!("/invoice/{invoice_id}/update/")
}

/// Rendered invoice PDF.
pub fn invoice_pdf(invoice_id: u64) -> String {
    format!("/invoice/{invoice_id}/pdf/")
}
