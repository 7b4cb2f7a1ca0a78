//! Shared fixtures for unit tests.

use crate::inventory::{
    EndpointDescriptor, HandlerId, Inventory, ModuleDeclaration, ResourceDeclaration, Route,
};
use crate::metadata::{
    EnumOptionDescriptor, FieldType, MemberDescriptor, TypeDescriptor, TypeRegistry,
};

fn member(name: &str, type_key: &str) -> MemberDescriptor {
    MemberDescriptor::new(name, FieldType::new(type_key))
}

fn members(name: &str, type_key: &str) -> MemberDescriptor {
    MemberDescriptor::new(name, FieldType::list_of(type_key))
}

fn endpoint(handler_type: &str, method: &str, pattern: &str, verb: &str) -> EndpointDescriptor {
    EndpointDescriptor::new(
        HandlerId::new(handler_type, method),
        Route::new(pattern, &[verb]),
    )
}

fn types() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        // catalog
        .register(TypeDescriptor::complex(
            "shop::catalog::Product",
            "Product",
            vec![
                member("id", "i64"),
                member("name", "string"),
                member("category", "shop::catalog::Category"),
            ],
        ))
        .register(TypeDescriptor::complex(
            "shop::catalog::Category",
            "Category",
            vec![
                member("id", "i64"),
                member("name", "string"),
                member("parent", "shop::catalog::Category"),
                members("products", "shop::catalog::Product"),
            ],
        ))
        .register(TypeDescriptor::complex(
            "shop::catalog::ProductKey",
            "ProductKey",
            vec![member("id", "i64")],
        ))
        .register(TypeDescriptor::complex(
            "shop::catalog::ProductQuery",
            "ProductQuery",
            vec![member("category", "i64").querystring()],
        ))
        // orders
        .register(TypeDescriptor::enumeration(
            "shop::orders::Status",
            "Status",
            vec![
                EnumOptionDescriptor::new("Shipped", 1),
                EnumOptionDescriptor::new("Open", 0),
            ],
        ))
        .register(TypeDescriptor::complex(
            "shop::orders::Order",
            "Order",
            vec![
                member("id", "i64"),
                member("status", "shop::orders::Status"),
                member("customer", "shop::orders::Customer"),
                members("lines", "shop::orders::Line"),
                member("audit", "shop::orders::Audit"),
            ],
        ))
        .register(TypeDescriptor::complex(
            "shop::orders::Customer",
            "Customer",
            vec![member("id", "i64"), member("name", "string")],
        ))
        .register(TypeDescriptor::complex(
            "shop::orders::Line",
            "Line",
            vec![
                member("product", "shop::catalog::Product"),
                member("quantity", "i32"),
            ],
        ))
        .register(TypeDescriptor::complex(
            "shop::orders::OrderInput",
            "OrderInput",
            vec![
                member("id", "i64"),
                member("customer", "shop::orders::Customer"),
                members("lines", "shop::orders::Line"),
                member("session", "string").auto_bound(),
            ],
        ))
        .register(TypeDescriptor::complex(
            "shop::orders::OrderKey",
            "OrderKey",
            vec![member("id", "i64")],
        ))
        .register(TypeDescriptor::complex("shop::orders::Audit", "Audit", vec![]).hidden())
        // admin
        .register(TypeDescriptor::complex(
            "admin::User",
            "User",
            vec![member("id", "i64"), member("name", "string")],
        ))
        .register(TypeDescriptor::complex(
            "admin::UserKey",
            "UserKey",
            vec![member("id", "i64")],
        ));
    registry
}

/// A small shop: a catalog module, an orders module with an explicitly
/// annotated invoices resource, and an admin handler outside every module.
pub fn shop_inventory() -> Inventory {
    const PRODUCTS: &str = "shop::catalog::ProductsHandler";
    const ORDERS: &str = "shop::orders::OrdersHandler";

    let mut purge = endpoint(ORDERS, "purge", "orders", "DELETE");
    purge.hidden = true;
    let mut debug = endpoint("shop::orders::DebugHandler", "debug", "debug", "GET");
    debug.handler_hidden = true;

    Inventory {
        types: types(),
        modules: vec![
            ModuleDeclaration {
                namespace: "shop::catalog".into(),
                name: "Catalog".into(),
                comments: Some("Products and categories.".into()),
            },
            ModuleDeclaration {
                namespace: "shop::orders".into(),
                name: "Orders".into(),
                comments: None,
            },
        ],
        resources: vec![
            ResourceDeclaration {
                namespace: "shop::catalog".into(),
                name: "Products".into(),
                comments: None,
            },
            ResourceDeclaration {
                namespace: "shop::orders".into(),
                name: "Orders".into(),
                comments: None,
            },
        ],
        endpoints: vec![
            endpoint(PRODUCTS, "get", "products/{id}", "GET")
                .with_input(FieldType::new("shop::catalog::ProductKey"))
                .with_output(FieldType::new("shop::catalog::Product")),
            endpoint(PRODUCTS, "list", "products", "GET")
                .with_input(FieldType::new("shop::catalog::ProductQuery"))
                .with_output(FieldType::list_of("shop::catalog::Product")),
            endpoint("shop::catalog::CategoriesHandler", "list", "categories", "GET")
                .with_output(FieldType::list_of("shop::catalog::Category")),
            endpoint(ORDERS, "delete", "orders/{id}", "DELETE")
                .with_input(FieldType::new("shop::orders::OrderKey")),
            endpoint(ORDERS, "update", "orders/{id}", "PUT")
                .with_input(FieldType::new("shop::orders::OrderInput"))
                .with_output(FieldType::new("shop::orders::Order")),
            endpoint(ORDERS, "get", "orders/{id}", "GET")
                .with_input(FieldType::new("shop::orders::OrderKey"))
                .with_output(FieldType::new("shop::orders::Order")),
            endpoint(ORDERS, "create", "orders", "POST")
                .with_input(FieldType::new("shop::orders::OrderInput"))
                .with_output(FieldType::new("shop::orders::Order")),
            endpoint(ORDERS, "list", "orders", "GET")
                .with_output(FieldType::list_of("shop::orders::Order")),
            purge,
            endpoint("shop::orders::InvoicesHandler", "get", "orders/{id}/invoice", "GET")
                .with_input(FieldType::new("shop::orders::OrderKey"))
                .with_output(FieldType::new("bytes"))
                .in_resource("Invoices"),
            debug,
            endpoint("admin::UsersHandler", "list", "users", "GET")
                .with_output(FieldType::list_of("admin::User")),
            endpoint("admin::UsersHandler", "get", "users/{id}", "GET")
                .with_input(FieldType::new("admin::UserKey"))
                .with_output(FieldType::new("admin::User")),
        ],
    }
}
