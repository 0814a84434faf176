pub mod transaction_docs;
