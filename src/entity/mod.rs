pub mod categories;
pub mod employees;
pub mod inventory_items;
pub mod inventory_transactions;
pub mod invoice_items;
pub mod invoices;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod reservations;
pub mod restaurants;
pub mod roles;
pub mod tables;
pub mod users;

pub use categories::Entity as Categories;
pub use employees::Entity as Employees;
pub use inventory_items::Entity as InventoryItems;
pub use inventory_transactions::Entity as InventoryTransactions;
pub use invoice_items::Entity as InvoiceItems;
pub use invoices::Entity as Invoices;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use reservations::Entity as Reservations;
pub use restaurants::Entity as Restaurants;
pub use roles::Entity as Roles;
pub use tables::Entity as Tables;
pub use users::Entity as Users;

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    use super::*;

    // Every owning side declared with has_many/has_one needs the child's
    // inverse link, or the join cannot be built at all.
    #[test]
    fn parent_joins_build_from_the_child_side() {
        let cases = [
            MenuItems::find()
                .find_also_related(Restaurants)
                .build(DbBackend::Postgres)
                .to_string(),
            Orders::find()
                .find_also_related(Restaurants)
                .build(DbBackend::Postgres)
                .to_string(),
            Orders::find()
                .find_also_related(Employees)
                .build(DbBackend::Postgres)
                .to_string(),
            Reservations::find()
                .find_also_related(Restaurants)
                .build(DbBackend::Postgres)
                .to_string(),
            InventoryItems::find()
                .find_also_related(Restaurants)
                .build(DbBackend::Postgres)
                .to_string(),
        ];
        for sql in cases {
            assert!(sql.contains("JOIN"), "{sql}");
        }
    }
}
