pub mod categories;
pub mod employees;
pub mod inventory;
pub mod invoices;
pub mod menu_items;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod restaurants;
pub mod roles;
pub mod tables;
