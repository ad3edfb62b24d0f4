//! Endpoint descriptors

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,

    /// `POST`
    Post,

    /// `PATCH`
    Patch,

    /// `DELETE`
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A static `{path, method}` pair identifying one backend operation.
///
/// Paths may carry one `{id}` placeholder, filled in by [`Endpoint::path_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Stable name used in logs.
    pub name: &'static str,

    /// Path relative to the API base URL.
    pub path: &'static str,

    /// HTTP verb.
    pub method: Method,
}

const fn endpoint(name: &'static str, path: &'static str, method: Method) -> Endpoint {
    Endpoint { name, path, method }
}

/// Every backend route, named after its path.
impl Endpoint {
    pub const SIGN_UP: Self = endpoint("sign_up", "/api/signup", Method::Post);
    pub const ADD_ADMIN_EMPLOYEE: Self =
        endpoint("add_admin_employee", "/api/add-admin-employee", Method::Post);
    pub const SIGN_IN: Self = endpoint("sign_in", "/api/signin", Method::Post);
    pub const CURRENT_USER: Self = endpoint("current_user", "/api/user-details", Method::Get);
    pub const LOGOUT_USER: Self = endpoint("logout_user", "/api/userLogout", Method::Get);
    pub const ALL_ROLES: Self = endpoint("all_roles", "/api/all-role", Method::Get);
    pub const ALL_USERS: Self = endpoint("all_users", "/api/all-user", Method::Get);
    pub const UPDATE_USER: Self = endpoint("update_user", "/api/update-user", Method::Patch);
    pub const DELETE_USER: Self = endpoint("delete_user", "/api/delete-user", Method::Post);

    pub const ALL_CATEGORIES: Self = endpoint("all_categories", "/api/get-category", Method::Get);
    pub const ADD_CATEGORY: Self = endpoint("add_category", "/api/add-category", Method::Post);
    pub const UPDATE_CATEGORY: Self =
        endpoint("update_category", "/api/update-category", Method::Post);
    pub const DELETE_CATEGORY: Self =
        endpoint("delete_category", "/api/delete-category", Method::Post);

    pub const UPLOAD_PRODUCT: Self = endpoint("upload_product", "/api/upload-product", Method::Post);
    pub const ALL_PRODUCTS: Self = endpoint("all_products", "/api/get-product", Method::Get);
    pub const PRODUCTS_BY_CATEGORY: Self = endpoint(
        "products_by_category",
        "/api/get-product-by-category",
        Method::Get,
    );
    pub const UPDATE_PRODUCT: Self = endpoint("update_product", "/api/update-product", Method::Post);
    pub const DELETE_PRODUCT: Self = endpoint("delete_product", "/api/delete-product", Method::Post);
    pub const CATEGORY_PRODUCT: Self =
        endpoint("category_product", "/api/get-categoryProduct", Method::Get);
    pub const CATEGORY_WISE_PRODUCT: Self =
        endpoint("category_wise_product", "/api/category-product", Method::Post);
    pub const PRODUCT_DETAILS: Self =
        endpoint("product_details", "/api/product-details", Method::Post);

    pub const ADD_TO_CART: Self = endpoint("add_to_cart", "/api/addtocart", Method::Post);
    pub const CART_COUNT: Self = endpoint("cart_count", "/api/countAddToCartProduct", Method::Get);
    pub const CART_VIEW: Self = endpoint("cart_view", "/api/view-card-product", Method::Get);
    pub const UPDATE_CART_ITEM: Self =
        endpoint("update_cart_item", "/api/update-cart-product", Method::Post);
    pub const DELETE_CART_ITEM: Self =
        endpoint("delete_cart_item", "/api/delete-cart-product", Method::Post);

    pub const SEARCH_PRODUCTS: Self = endpoint("search_products", "/api/search", Method::Get);
    pub const FILTER_PRODUCTS: Self = endpoint("filter_products", "/api/filter-product", Method::Post);

    pub const PAYMENT_INITIATE: Self = endpoint("payment_initiate", "/api/initiate", Method::Post);
    pub const PAYMENT_CONFIRM: Self = endpoint("payment_confirm", "/api/confirm", Method::Post);
    pub const PAYMENT_CALLBACK: Self = endpoint("payment_callback", "/api/callback", Method::Post);
    pub const ALL_PAYMENTS: Self = endpoint("all_payments", "/api/all-payments", Method::Get);
    pub const APPROVE_PAYMENT: Self =
        endpoint("approve_payment", "/api/approve/{id}", Method::Patch);

    pub const MESSAGE_CREATE: Self = endpoint("message_create", "/api/create-message", Method::Post);
    pub const ALL_MESSAGES: Self = endpoint("all_messages", "/api/all-messages", Method::Get);
    pub const MESSAGE_DELETE: Self =
        endpoint("message_delete", "/api/delete-message/{id}", Method::Delete);

    /// Takes a `userId` query parameter.
    pub const NOTIFICATIONS: Self = endpoint("notifications", "/api/notifications", Method::Get);

    // The backend does not publish the two mark-read routes. These are the
    // only place they are spelled out.
    pub const MARK_NOTIFICATION_READ: Self = endpoint(
        "mark_notification_read",
        "/api/notifications/{id}/read",
        Method::Patch,
    );
    /// Takes a `userId` query parameter.
    pub const MARK_ALL_NOTIFICATIONS_READ: Self = endpoint(
        "mark_all_notifications_read",
        "/api/notifications/read-all",
        Method::Patch,
    );

    /// Every descriptor, in table order.
    pub const ALL: [Self; 39] = [
        Self::SIGN_UP,
        Self::ADD_ADMIN_EMPLOYEE,
        Self::SIGN_IN,
        Self::CURRENT_USER,
        Self::LOGOUT_USER,
        Self::ALL_ROLES,
        Self::ALL_USERS,
        Self::UPDATE_USER,
        Self::DELETE_USER,
        Self::ALL_CATEGORIES,
        Self::ADD_CATEGORY,
        Self::UPDATE_CATEGORY,
        Self::DELETE_CATEGORY,
        Self::UPLOAD_PRODUCT,
        Self::ALL_PRODUCTS,
        Self::PRODUCTS_BY_CATEGORY,
        Self::UPDATE_PRODUCT,
        Self::DELETE_PRODUCT,
        Self::CATEGORY_PRODUCT,
        Self::CATEGORY_WISE_PRODUCT,
        Self::PRODUCT_DETAILS,
        Self::ADD_TO_CART,
        Self::CART_COUNT,
        Self::CART_VIEW,
        Self::UPDATE_CART_ITEM,
        Self::DELETE_CART_ITEM,
        Self::SEARCH_PRODUCTS,
        Self::FILTER_PRODUCTS,
        Self::PAYMENT_INITIATE,
        Self::PAYMENT_CONFIRM,
        Self::PAYMENT_CALLBACK,
        Self::ALL_PAYMENTS,
        Self::APPROVE_PAYMENT,
        Self::MESSAGE_CREATE,
        Self::ALL_MESSAGES,
        Self::MESSAGE_DELETE,
        Self::NOTIFICATIONS,
        Self::MARK_NOTIFICATION_READ,
        Self::MARK_ALL_NOTIFICATIONS_READ,
    ];

    /// Whether the path has an `{id}` placeholder.
    pub fn takes_id(&self) -> bool {
        self.path.contains("{id}")
    }

    /// Path with the `{id}` placeholder filled in.
    ///
    /// An id passed to an endpoint without a placeholder is ignored.
    pub fn path_for(&self, id: Option<&str>) -> String {
        match id {
            Some(id) if self.takes_id() => self.path.replace("{id}", id),
            _ => self.path.to_string(),
        }
    }
}
