use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{OrderStatus, PaymentMethod, ReservationStatus, RoleName, TableStatus},
    dto::{
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        employees::{CreateEmployeeRequest, EmployeeList, UpdateEmployeeRequest},
        inventory::{
            CreateInventoryItemRequest, CreateInventoryTransactionRequest, InventoryItemList,
            InventoryTransactionList, UpdateInventoryItemRequest, UpdateStockLevelRequest,
        },
        invoices::{InvoiceDetails, InvoiceLine, InvoiceList},
        menu_items::{
            CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest, UpdatePriceRequest,
        },
        orders::{
            CreateOrderItemRequest, CreateOrderRequest, OrderDetails, OrderLine, OrderList,
            UpdateOrderStatusRequest,
        },
        payments::{CreatePaymentRequest, PaymentList},
        reports::{SalesReport, SalesReportRequest},
        reservations::{CreateReservationRequest, ReservationList, UpdateReservationRequest},
        restaurants::{CreateRestaurantRequest, RestaurantList, UpdateRestaurantRequest},
        roles::{CreateRoleRequest, RoleList, UpdateRoleRequest},
        tables::{
            CreateTableRequest, TableCount, TableList, UpdateTableRequest,
            UpdateTableStatusRequest,
        },
    },
    models::{
        Category, Employee, InventoryItem, InventoryTransaction, MenuItem, Payment, Reservation,
        Restaurant, Role, Table,
    },
    response::{ApiResponse, Meta},
    routes::{
        categories, employees, health, inventory, invoices, menu_items, orders, payments, reports,
        reservations, restaurants, roles, tables,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        menu_items::list_menu_items,
        menu_items::list_menu_items_by_category,
        menu_items::get_menu_item,
        menu_items::create_menu_item,
        menu_items::update_menu_item,
        menu_items::update_menu_item_price,
        menu_items::delete_menu_item,
        tables::list_tables,
        tables::list_tables_by_status,
        tables::count_tables,
        tables::get_table,
        tables::create_table,
        tables::update_table,
        tables::update_table_status,
        tables::delete_table,
        orders::list_orders,
        orders::list_active_orders,
        orders::list_orders_by_day,
        orders::list_orders_by_status,
        orders::get_order,
        orders::create_order,
        orders::update_order_status,
        payments::make_payment,
        payments::list_payments,
        payments::get_payment,
        payments::get_payment_for_order,
        invoices::generate_invoice,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::get_invoice_for_order,
        invoices::list_daily_invoices,
        reservations::list_reservations,
        reservations::search_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        inventory::list_inventory_items,
        inventory::list_low_stock_items,
        inventory::get_inventory_item,
        inventory::create_inventory_item,
        inventory::update_inventory_item,
        inventory::update_stock_level,
        inventory::delete_inventory_item,
        inventory::create_inventory_transaction,
        inventory::list_item_transactions,
        inventory::list_transactions,
        inventory::list_employee_transactions,
        inventory::delete_inventory_transaction,
        reports::sales_report,
        restaurants::get_my_restaurant,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::create_restaurant,
        restaurants::update_restaurant,
        restaurants::delete_restaurant,
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
        roles::list_roles_for_user,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
    ),
    components(
        schemas(
            OrderStatus,
            TableStatus,
            PaymentMethod,
            ReservationStatus,
            RoleName,
            Restaurant,
            Employee,
            Role,
            Category,
            MenuItem,
            Table,
            Payment,
            Reservation,
            InventoryItem,
            InventoryTransaction,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            UpdatePriceRequest,
            MenuItemList,
            CreateTableRequest,
            UpdateTableRequest,
            UpdateTableStatusRequest,
            TableList,
            TableCount,
            CreateOrderItemRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderLine,
            OrderDetails,
            OrderList,
            CreatePaymentRequest,
            PaymentList,
            InvoiceLine,
            InvoiceDetails,
            InvoiceList,
            CreateReservationRequest,
            UpdateReservationRequest,
            ReservationList,
            CreateInventoryItemRequest,
            UpdateInventoryItemRequest,
            UpdateStockLevelRequest,
            CreateInventoryTransactionRequest,
            InventoryItemList,
            InventoryTransactionList,
            SalesReportRequest,
            SalesReport,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            RestaurantList,
            CreateEmployeeRequest,
            UpdateEmployeeRequest,
            EmployeeList,
            CreateRoleRequest,
            UpdateRoleRequest,
            RoleList,
            health::HealthData,
            Meta,
            ApiResponse<Category>,
            ApiResponse<MenuItem>,
            ApiResponse<Table>,
            ApiResponse<OrderDetails>,
            ApiResponse<Payment>,
            ApiResponse<InvoiceDetails>,
            ApiResponse<Reservation>,
            ApiResponse<InventoryItem>,
            ApiResponse<SalesReport>,
            ApiResponse<Restaurant>,
            ApiResponse<Employee>,
            ApiResponse<Role>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Categories", description = "Menu category endpoints"),
        (name = "Menu", description = "Menu item endpoints"),
        (name = "Tables", description = "Dining table endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Payment endpoints"),
        (name = "Invoices", description = "Invoice endpoints"),
        (name = "Reservations", description = "Reservation endpoints"),
        (name = "Inventory", description = "Inventory endpoints"),
        (name = "Reports", description = "Sales report endpoints"),
        (name = "Restaurants", description = "Restaurant endpoints"),
        (name = "Employees", description = "Employee endpoints"),
        (name = "Roles", description = "Role endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
