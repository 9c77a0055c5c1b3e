pub mod category_service;
pub mod employee_service;
pub mod inventory_service;
pub mod invoice_service;
pub mod menu_item_service;
pub mod order_service;
pub mod payment_service;
pub mod report_service;
pub mod reservation_service;
pub mod restaurant_service;
pub mod role_service;
pub mod table_service;
