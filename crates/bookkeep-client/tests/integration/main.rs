mod support;
mod test_account;
