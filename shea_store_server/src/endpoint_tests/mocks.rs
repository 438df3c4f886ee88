use mockall::mock;
use shea_store_engine::{
    db_types::{
        CartItem,
        CartLine,
        Category,
        NewCategory,
        NewProduct,
        NewReview,
        NewUser,
        Product,
        Review,
        TransactionId,
        User,
    },
    traits::{
        CartError,
        CartManagement,
        CatalogError,
        CatalogManagement,
        GatewayCheckout,
        GatewayError,
        GatewayPaymentRequest,
        GatewayPaymentStatus,
        PaymentGateway,
        ReviewManagement,
        UserError,
        UserManagement,
    },
};

mock! {
    pub UserStore {}
    impl Clone for UserStore {
        fn clone(&self) -> Self;
    }
    impl UserManagement for UserStore {
        async fn insert_user(&self, user: NewUser) -> Result<User, UserError>;
        async fn fetch_user(&self, id: i64) -> Result<Option<User>, UserError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
    }
}

mock! {
    pub CatalogStore {}
    impl Clone for CatalogStore {
        fn clone(&self) -> Self;
    }
    impl CatalogManagement for CatalogStore {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;
        async fn fetch_featured_products(&self, limit: i64) -> Result<Vec<Product>, CatalogError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogError>;
        async fn fetch_products_for_category(&self, category_id: i64) -> Result<Vec<Product>, CatalogError>;
        async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError>;
        async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogError>;
        async fn count_products(&self) -> Result<i64, CatalogError>;
        async fn insert_category(&self, category: NewCategory) -> Result<Category, CatalogError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogError>;
    }
    impl ReviewManagement for CatalogStore {
        async fn fetch_reviews_for_product(&self, product_id: i64) -> Result<Vec<Review>, CatalogError>;
        async fn insert_review(&self, user_id: i64, review: NewReview) -> Result<Review, CatalogError>;
    }
}

mock! {
    pub CartStore {}
    impl Clone for CartStore {
        fn clone(&self) -> Self;
    }
    impl CartManagement for CartStore {
        async fn add_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, CartError>;
        async fn update_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<Option<CartItem>, CartError>;
        async fn remove_cart_item(&self, user_id: i64, product_id: i64) -> Result<bool, CartError>;
        async fn clear_cart(&self, user_id: i64) -> Result<bool, CartError>;
        async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartError>;
    }
}

mock! {
    pub Gateway {}
    impl Clone for Gateway {
        fn clone(&self) -> Self;
    }
    impl PaymentGateway for Gateway {
        async fn create_payment(&self, request: GatewayPaymentRequest) -> Result<GatewayCheckout, GatewayError>;
        async fn check_payment(&self, txid: &TransactionId) -> Result<GatewayPaymentStatus, GatewayError>;
    }
}
