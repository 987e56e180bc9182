use super::normalize::normalize_label;
use super::reconcile::CatalogProduct;

/// Search term plus brand/category selections, all compared on normalized keys.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    search: String,
    brands: Vec<String>,
    categories: Vec<String>,
}

impl CatalogFilter {
    pub fn new<B, C>(search: Option<&str>, brands: B, categories: C) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            search: search.map(normalize_label).unwrap_or_default(),
            brands: normalized_keys(brands),
            categories: normalized_keys(categories),
        }
    }

    /// Builds a filter from comma separated brand and category lists.
    pub fn from_lists(search: Option<&str>, brands: Option<&str>, categories: Option<&str>) -> Self {
        Self::new(
            search,
            brands.map(|b| b.split(',').collect::<Vec<_>>()).unwrap_or_default(),
            categories.map(|c| c.split(',').collect::<Vec<_>>()).unwrap_or_default(),
        )
    }

    pub fn matches(&self, product: &CatalogProduct) -> bool {
        let search_matches = self.search.is_empty()
            || normalize_label(&product.product.code).contains(&self.search)
            || normalize_label(&product.product.name).contains(&self.search)
            || product.normalized_brand.contains(&self.search)
            || product.normalized_category.contains(&self.search);

        let brand_matches = self.brands.is_empty() || self.brands.contains(&product.normalized_brand);
        let category_matches =
            self.categories.is_empty() || self.categories.contains(&product.normalized_category);

        search_matches && brand_matches && category_matches
    }

    pub fn apply<'a>(&'a self, products: &'a [CatalogProduct]) -> impl Iterator<Item = &'a CatalogProduct> + 'a {
        products.iter().filter(move |p| self.matches(p))
    }
}

fn normalized_keys<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| normalize_label(v.as_ref()))
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::reconcile::{recompute_all, tests::product};

    fn catalog() -> Vec<CatalogProduct> {
        let mut milk = product(1, "MLK-1", 0);
        milk.name = "Whole Milk".to_string();
        milk.brand = Some("Farmland".to_string());
        milk.category = Some("Dairy".to_string());
        let mut bread = product(2, "BRD-9", 0);
        bread.name = "Rye Bread".to_string();
        bread.brand = Some("Baker Co".to_string());
        bread.category = Some("Bakery".to_string());
        let plain = product(3, "XYZ", 0);
        recompute_all(vec![milk, bread, plain], &[])
    }

    fn ids(filter: &CatalogFilter, products: &[CatalogProduct]) -> Vec<i64> {
        filter.apply(products).map(|p| p.id()).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let products = catalog();
        assert_eq!(ids(&CatalogFilter::default(), &products), vec![1, 2, 3]);
    }

    #[test]
    fn search_covers_code_name_brand_and_category() {
        let products = catalog();
        assert_eq!(ids(&CatalogFilter::from_lists(Some("mlk"), None, None), &products), vec![1]);
        assert_eq!(ids(&CatalogFilter::from_lists(Some(" RYE "), None, None), &products), vec![2]);
        assert_eq!(ids(&CatalogFilter::from_lists(Some("farm"), None, None), &products), vec![1]);
        assert_eq!(ids(&CatalogFilter::from_lists(Some("bakery"), None, None), &products), vec![2]);
    }

    #[test]
    fn brand_and_category_filters_combine() {
        let products = catalog();
        let filter = CatalogFilter::from_lists(None, Some("farmland, baker co"), Some("DAIRY"));
        assert_eq!(ids(&filter, &products), vec![1]);

        let filter = CatalogFilter::from_lists(None, Some(" , "), None);
        assert_eq!(ids(&filter, &products), vec![1, 2, 3]);
    }
}
