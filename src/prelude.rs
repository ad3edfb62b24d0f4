//! Fruitcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{AddToCart, Cart, CartItem, CartItemId, QuantityChange},
    categories::{Category, CategoryId, CategoryRef, display_name},
    checkout::{CheckoutError, Payer, PaymentKind, PaymentRequest, cart_payments, product_payment},
    dashboard::{AdminDashboard, ManagerDashboard, SalesDashboard, TrendPoint},
    ids::TypedId,
    listing::{DEFAULT_PAGE_SIZE, ListQuery, Listable, Page, SortKey, apply, facet_options},
    messages::{Message, MessageId, MessagesAction, MessagesSlice},
    money::{PriceFormatError, PriceFormatter},
    notifications::{Notification, NotificationFeed, NotificationId, NotificationsResponse},
    payments::{
        Payment, PaymentId, PaymentQuery, PaymentStats, PaymentStatus, PaymentsResponse,
        ensure_approvable,
    },
    products::{Product, ProductDraft, ProductId},
    roles::{Panel, Role, RoleOption},
    users::{User, UserId},
    validation::{
        ContactForm, EmployeeEdit, EmployeeForm, ProfileForm, SignUpForm, ValidationError,
        ValidationErrors,
    },
};
