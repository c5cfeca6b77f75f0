//! GraphQL query definitions for the local store (Admin API).
//!
//! Uses `graphql_client` to generate type-safe Rust code from GraphQL queries.

use graphql_client::GraphQLQuery;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/store/schema.graphql",
    query_path = "graphql/store/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetExistingHandles;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/store/schema.graphql",
    query_path = "graphql/store/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct FindProductByHandle;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/store/schema.graphql",
    query_path = "graphql/store/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct CreateImportedProduct;
