//! GraphQL query definitions for the remote catalog (Storefront API).

use graphql_client::GraphQLQuery;

// Scalar types for the Storefront schema subset
// Must be defined in the same module where GraphQLQuery derive is used
// Note: These MUST match the GraphQL schema scalar names exactly (uppercase)
#[allow(clippy::upper_case_acronyms)]
type URL = String;
type Decimal = String;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/catalog/schema.graphql",
    query_path = "graphql/catalog/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetCatalogPage;
