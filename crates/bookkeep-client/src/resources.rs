//! Helpers for the bookkeep resource endpoints.
//!
//! The backend owns the shape and rules of these records, so they are
//! exchanged as untyped JSON. List endpoints are scoped to the selected company.

use bookkeep_common::{api::CompanyScope, routes};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{Client, Error};

impl Client {
    fn company_scope(&self) -> Result<CompanyScope, Error> {
        Ok(CompanyScope {
            company: self.require_company()?,
        })
    }

    /// Companies the current user can access.
    pub async fn companies(&self) -> Result<Value, Error> {
        self.post(routes::COMPANY_LIST, &json!({})).await
    }

    /// Parties of the selected company.
    pub async fn parties(&self) -> Result<Value, Error> {
        self.post(routes::PARTY_LIST, &self.company_scope()?).await
    }

    /// Party types.
    pub async fn party_types(&self) -> Result<Value, Error> {
        self.get(routes::PARTY_TYPES).await
    }

    /// A party of the selected company.
    pub async fn party(&self, party_id: u64) -> Result<Value, Error> {
        self.get(routes::party(self.require_company()?, party_id))
            .await
    }

    /// Create a party.
    pub async fn create_party<B: Serialize + ?Sized>(&self, party: &B) -> Result<Value, Error> {
        self.post(routes::PARTY_CREATE, party).await
    }

    /// Update a party.
    pub async fn update_party<B: Serialize + ?Sized>(
        &self,
        party_id: u64,
        party: &B,
    ) -> Result<Value, Error> {
        self.put(routes::party_update(party_id), party).await
    }

    /// Items of the selected company owned by `customer_id`.
    pub async fn items(&self, customer_id: u64) -> Result<Value, Error> {
        let body = json!({
            "company": self.require_company()?,
            "customer_id": customer_id,
        });
        self.post(routes::ITEM_LIST, &body).await
    }

    /// Item unit types.
    pub async fn item_units(&self) -> Result<Value, Error> {
        self.get(routes::ITEM_UNITS).await
    }

    /// An item of the selected company.
    pub async fn item(&self, item_id: u64) -> Result<Value, Error> {
        self.get(routes::item(self.require_company()?, item_id)).await
    }

    /// Create an item.
    pub async fn create_item<B: Serialize + ?Sized>(&self, item: &B) -> Result<Value, Error> {
        self.post(routes::ITEM_CREATE, item).await
    }

    /// Update an item of the selected company.
    pub async fn update_item<B: Serialize + ?Sized>(
        &self,
        item_id: u64,
        item: &B,
    ) -> Result<Value, Error> {
        self.put(routes::item_update(self.require_company()?, item_id), item)
            .await
    }

    /// Invoices of the selected company.
    pub async fn invoices(&self) -> Result<Value, Error> {
        self.post(routes::INVOICE_LIST, &self.company_scope()?).await
    }

    /// Invoice types.
    pub async fn invoice_types(&self) -> Result<Value, Error> {
        self.get(routes::INVOICE_TYPES).await
    }

    /// An invoice with its line items.
    pub async fn invoice(&self, invoice_id: u64) -> Result<Value, Error> {
        self.get(routes::invoice(invoice_id)).await
    }

    /// Create an invoice. Totals, discounts and taxes are computed by the backend.
    pub async fn create_invoice<B: Serialize + ?Sized>(&self, invoice: &B) -> Result<Value, Error> {
        self.post(routes::INVOICE_CREATE, invoice).await
    }

    /// Update an invoice.
    pub async fn update_invoice<B: Serialize + ?Sized>(
        &self,
        invoice_id: u64,
        invoice: &B,
    ) -> Result<Value, Error> {
        self.put(routes::invoice_update(invoice_id), invoice).await
    }

    /// The rendered PDF of an invoice.
    pub async fn invoice_pdf(&self, invoice_id: u64) -> Result<Bytes, Error> {
        self.get_bytes(routes::invoice_pdf(invoice_id)).await
    }

    /// Bank accounts of the selected company.
    pub async fn bank_accounts(&self) -> Result<Value, Error> {
        self.post(routes::BANK_ACCOUNTS, &self.company_scope()?).await
    }

    /// Payment types.
    pub async fn payment_types(&self) -> Result<Value, Error> {
        self.get(routes::PAYMENT_TYPES).await
    }

    /// Incoming and outgoing payments of the selected company.
    pub async fn payments(&self) -> Result<Value, Error> {
        self.post(routes::PAYMENT_LIST, &self.company_scope()?).await
    }

    /// Record a payment received against a sales invoice.
    pub async fn payment_in<B: Serialize + ?Sized>(&self, payment: &B) -> Result<Value, Error> {
        self.post(routes::PAYMENT_IN, payment).await
    }

    /// Record a payment made against a purchase invoice.
    pub async fn payment_out<B: Serialize + ?Sized>(&self, payment: &B) -> Result<Value, Error> {
        self.post(routes::PAYMENT_OUT, payment).await
    }
}
