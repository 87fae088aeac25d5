use bookkeep_common::{id::CompanyId, routes};

const ACME: CompanyId = CompanyId::new(42);

#[test]
fn company_scoped_paths() {
    assert_eq!(routes::company(ACME), "/company/42/");
    assert_eq!(routes::party(ACME, 7), "/parties/42/7/");
    assert_eq!(routes::item(ACME, 9), "/items/42/9/");
    assert_eq!(routes::item_update(ACME, 9), "/items/42/9/update/");
}

#[test]
fn invoice_paths() {
    assert_eq!(routes::invoice(5), "/invoice/5/");
    assert_eq!(routes::invoice_update(5), "/invoice/5/update/");
    assert_eq!(routes::invoice_pdf(5), "/invoice/5/pdf/");
}

#[test]
fn all_paths_are_rooted_with_trailing_slash() {
    for path in [
        routes::LOGIN,
        routes::REGISTER,
        routes::CURRENT_USER,
        routes::TOKEN_REFRESH,
        routes::COMPANY_LIST,
        routes::PARTY_LIST,
        routes::PARTY_TYPES,
        routes::PARTY_CREATE,
        routes::ITEM_LIST,
        routes::ITEM_UNITS,
        routes::ITEM_CREATE,
        routes::INVOICE_LIST,
        routes::INVOICE_TYPES,
        routes::INVOICE_CREATE,
        routes::BANK_ACCOUNTS,
        routes::PAYMENT_TYPES,
        routes::PAYMENT_LIST,
        routes::PAYMENT_IN,
        routes::PAYMENT_OUT,
    ] {
        assert!(path.starts_with('/') && path.ends_with('/'), "{path}");
    }
}
