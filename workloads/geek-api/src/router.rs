//! Path and method dispatch.
//!
//! Resolution order: unknown path (404), unsupported method (405), then
//! malformed path ids (400).

use geek_catalog::{CategoryId, ProductId};
use http::Method;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListProducts,
    SearchProducts,
    GetProduct(ProductId),
    CreateProduct,
    UpdateProduct(ProductId),
    DeleteProduct(ProductId),
    MoveProducts,
    RemoveProducts,
    ListCategories,
    GetCategory(CategoryId),
    CreateCategory,
    UpdateCategory(CategoryId),
    DeleteCategory(CategoryId),
    HomePage,
    CategoryPage(CategoryId),
    ProductPage(ProductId),
    Login,
    Logout,
    Session,
}

/// A path template's endpoints, keyed by method.
enum Kind {
    Fixed(Endpoint),
    Product(fn(ProductId) -> Endpoint),
    Category(fn(CategoryId) -> Endpoint),
}

impl Endpoint {
    pub fn resolve(method: &Method, path: &str) -> Result<Self, ApiError> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let (routes, id): (Vec<(&'static str, Kind)>, Option<&str>) = match segments.as_slice() {
            ["api", "products"] => (vec![("GET", Kind::Fixed(Endpoint::ListProducts))], None),
            ["api", "products", "search"] => {
                (vec![("GET", Kind::Fixed(Endpoint::SearchProducts))], None)
            }
            ["api", "products", "move"] => {
                (vec![("POST", Kind::Fixed(Endpoint::MoveProducts))], None)
            }
            ["api", "products", "remove"] => {
                (vec![("POST", Kind::Fixed(Endpoint::RemoveProducts))], None)
            }
            ["api", "product"] => (vec![("POST", Kind::Fixed(Endpoint::CreateProduct))], None),
            ["api", "product", id] => (
                vec![
                    ("GET", Kind::Product(Endpoint::GetProduct)),
                    ("PUT", Kind::Product(Endpoint::UpdateProduct)),
                    ("PATCH", Kind::Product(Endpoint::UpdateProduct)),
                    ("DELETE", Kind::Product(Endpoint::DeleteProduct)),
                ],
                Some(*id),
            ),
            ["api", "categories"] => {
                (vec![("GET", Kind::Fixed(Endpoint::ListCategories))], None)
            }
            ["api", "category"] => {
                (vec![("POST", Kind::Fixed(Endpoint::CreateCategory))], None)
            }
            ["api", "category", id] => (
                vec![
                    ("GET", Kind::Category(Endpoint::GetCategory)),
                    ("PUT", Kind::Category(Endpoint::UpdateCategory)),
                    ("PATCH", Kind::Category(Endpoint::UpdateCategory)),
                    ("DELETE", Kind::Category(Endpoint::DeleteCategory)),
                ],
                Some(*id),
            ),
            ["api", "pages", "home"] => (vec![("GET", Kind::Fixed(Endpoint::HomePage))], None),
            ["api", "pages", "category", id] => (
                vec![("GET", Kind::Category(Endpoint::CategoryPage))],
                Some(*id),
            ),
            ["api", "pages", "product", id] => (
                vec![("GET", Kind::Product(Endpoint::ProductPage))],
                Some(*id),
            ),
            ["api", "auth", "login"] => (vec![("POST", Kind::Fixed(Endpoint::Login))], None),
            ["api", "auth", "logout"] => (vec![("POST", Kind::Fixed(Endpoint::Logout))], None),
            ["api", "auth", "session"] => (vec![("GET", Kind::Fixed(Endpoint::Session))], None),
            _ => return Err(ApiError::RouteNotFound),
        };

        let allowed: Vec<&'static str> = routes.iter().map(|(name, _)| *name).collect();
        let kind = routes
            .into_iter()
            .find(|(name, _)| *name == method.as_str())
            .map(|(_, kind)| kind)
            .ok_or_else(|| ApiError::MethodNotAllowed {
                method: method.to_string(),
                allowed,
            })?;

        let id = id.unwrap_or_default();
        match kind {
            Kind::Fixed(endpoint) => Ok(endpoint),
            Kind::Product(build) => ProductId::parse(id).map(build).ok_or(ApiError::InvalidId),
            Kind::Category(build) => CategoryId::parse(id).map(build).ok_or(ApiError::InvalidId),
        }
    }

    /// Admin endpoints need a valid session.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Endpoint::CreateProduct
                | Endpoint::UpdateProduct(_)
                | Endpoint::DeleteProduct(_)
                | Endpoint::MoveProducts
                | Endpoint::RemoveProducts
                | Endpoint::CreateCategory
                | Endpoint::UpdateCategory(_)
                | Endpoint::DeleteCategory(_)
        )
    }

    /// Whether the endpoint reads a request body.
    pub fn has_body(&self) -> bool {
        self.requires_admin() || matches!(self, Endpoint::Login)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::ListProducts => "list_products",
            Endpoint::SearchProducts => "search_products",
            Endpoint::GetProduct(_) => "get_product",
            Endpoint::CreateProduct => "create_product",
            Endpoint::UpdateProduct(_) => "update_product",
            Endpoint::DeleteProduct(_) => "delete_product",
            Endpoint::MoveProducts => "move_products",
            Endpoint::RemoveProducts => "remove_products",
            Endpoint::ListCategories => "list_categories",
            Endpoint::GetCategory(_) => "get_category",
            Endpoint::CreateCategory => "create_category",
            Endpoint::UpdateCategory(_) => "update_category",
            Endpoint::DeleteCategory(_) => "delete_category",
            Endpoint::HomePage => "home_page",
            Endpoint::CategoryPage(_) => "category_page",
            Endpoint::ProductPage(_) => "product_page",
            Endpoint::Login => "login",
            Endpoint::Logout => "logout",
            Endpoint::Session => "session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ID: &str = "8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c";

    #[rstest]
    #[case(Method::GET, "/api/products", Endpoint::ListProducts)]
    #[case(Method::GET, "/api/products/", Endpoint::ListProducts)]
    #[case(Method::GET, "/api/products/search", Endpoint::SearchProducts)]
    #[case(Method::POST, "/api/products/move", Endpoint::MoveProducts)]
    #[case(Method::POST, "/api/product", Endpoint::CreateProduct)]
    #[case(Method::PATCH, "/api/product/8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c", Endpoint::UpdateProduct(ProductId::new(ID)))]
    #[case(Method::DELETE, "/api/category/8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c", Endpoint::DeleteCategory(CategoryId::new(ID)))]
    #[case(Method::GET, "/api/pages/product/8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c", Endpoint::ProductPage(ProductId::new(ID)))]
    #[case(Method::GET, "/api/pages/home", Endpoint::HomePage)]
    #[case(Method::POST, "/api/auth/login", Endpoint::Login)]
    fn test_resolve(#[case] method: Method, #[case] path: &str, #[case] expected: Endpoint) {
        assert_eq!(Endpoint::resolve(&method, path).unwrap(), expected);
    }

    #[test]
    fn test_uppercase_id_is_normalized() {
        let endpoint =
            Endpoint::resolve(&Method::GET, &format!("/api/product/{}", ID.to_uppercase())).unwrap();
        assert_eq!(endpoint, Endpoint::GetProduct(ProductId::new(ID)));
    }

    #[rstest]
    #[case("/")]
    #[case("/api")]
    #[case("/api/product/a/b")]
    #[case("/api/pages/about")]
    fn test_unknown_route(#[case] path: &str) {
        assert!(matches!(
            Endpoint::resolve(&Method::GET, path),
            Err(ApiError::RouteNotFound)
        ));
    }

    #[test]
    fn test_method_not_allowed_before_id_check() {
        match Endpoint::resolve(&Method::POST, "/api/product/not-a-uuid") {
            Err(ApiError::MethodNotAllowed { method, allowed }) => {
                assert_eq!(method, "POST");
                assert_eq!(allowed, vec!["GET", "PUT", "PATCH", "DELETE"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_id() {
        assert!(matches!(
            Endpoint::resolve(&Method::GET, "/api/category/42"),
            Err(ApiError::InvalidId)
        ));
    }

    #[test]
    fn test_admin_endpoints() {
        assert!(Endpoint::CreateCategory.requires_admin());
        assert!(Endpoint::RemoveProducts.requires_admin());
        assert!(!Endpoint::HomePage.requires_admin());
        assert!(!Endpoint::Login.requires_admin());
        assert!(Endpoint::Login.has_body());
    }
}
