mod common;

use chrono::{Duration, Utc};
use diesel::prelude::*;
use larder_core::{aggregate, render_report, EdgeScope, PageRequest};
use larder_server::db::is_unique_violation;
use larder_server::models::RecipeChanges;
use larder_server::repo::recipes::{self, RecipeFilter, RecipeFields, NAME_CONSTRAINT};
use larder_server::repo::{catalog, images, RecipeEdge};
use larder_server::schema::{
    favorites, images as images_table, recipe_ingredients, recipe_tags, recipes as recipes_table,
    shopping_cart_items,
};
use uuid::Uuid;

use common::{image, ingredient, line, recipe, tag, test_connection, user};

fn first_page() -> PageRequest {
    PageRequest::new(None, Some(50), 6, 100).unwrap()
}

#[test]
fn test_create_stores_lines_in_order() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let breakfast = tag(&mut conn, "breakfast");
    let flour = ingredient(&mut conn, "store-flour", "g");
    let egg = ingredient(&mut conn, "store-egg", "pcs");

    let created = recipe(
        &mut conn,
        &author,
        "Pancakes",
        &[breakfast.id],
        &[line(&flour, 200), line(&egg, 2)],
    );

    let details = recipes::load_details(&mut conn, vec![created]).unwrap();
    let details = &details[0];
    assert_eq!(details.author.id, author.id);
    assert_eq!(details.tags, vec![breakfast]);
    let stored: Vec<(Uuid, i32)> = details
        .ingredients
        .iter()
        .map(|(ingredient, amount)| (ingredient.id, *amount))
        .collect();
    assert_eq!(stored, vec![(flour.id, 200), (egg.id, 2)]);
    assert_eq!(details.recipe.short_link.len(), 8);
}

#[test]
fn test_update_replaces_children() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let old_tag = tag(&mut conn, "old");
    let new_tag = tag(&mut conn, "new");
    let flour = ingredient(&mut conn, "replace-flour", "g");
    let sugar = ingredient(&mut conn, "replace-sugar", "g");

    let created = recipe(
        &mut conn,
        &author,
        "Cake",
        &[old_tag.id],
        &[line(&flour, 100)],
    );

    let updated = recipes::update_recipe(
        &mut conn,
        created.id,
        &RecipeChanges {
            cooking_time: Some(45),
            updated_at: Some(Utc::now()),
            ..Default::default()
        },
    )
    .unwrap();
    recipes::replace_children(&mut conn, created.id, &[new_tag.id], &[line(&sugar, 50)]).unwrap();

    assert_eq!(updated.cooking_time, 45);
    assert_eq!(updated.name, "Cake");
    assert_eq!(updated.short_link, created.short_link);

    let linked: Vec<Uuid> = recipe_ingredients::table
        .filter(recipe_ingredients::recipe_id.eq(created.id))
        .select(recipe_ingredients::ingredient_id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(linked, vec![sugar.id]);

    let tagged: Vec<Uuid> = recipe_tags::table
        .filter(recipe_tags::recipe_id.eq(created.id))
        .select(recipe_tags::tag_id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(tagged, vec![new_tag.id]);
}

#[test]
fn test_duplicate_name_per_author_is_rejected() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let other = user(&mut conn);
    let t = tag(&mut conn, "dup");
    let salt = ingredient(&mut conn, "dup-salt", "pinch");

    recipe(&mut conn, &author, "Soup", &[t.id], &[line(&salt, 1)]);
    // Another author may reuse the name.
    recipe(&mut conn, &other, "Soup", &[t.id], &[line(&salt, 1)]);

    let image_id = images::insert_image(&mut conn, &image()).unwrap();
    let result = conn.transaction(|conn| {
        recipes::insert_recipe(
            conn,
            &RecipeFields {
                author_id: author.id,
                name: "Soup",
                text: "Again.",
                image_id,
                cooking_time: 5,
            },
        )
    });
    let err = result.unwrap_err();
    assert!(is_unique_violation(&err, Some(NAME_CONSTRAINT)));
}

#[test]
fn test_delete_cascades() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let fan = user(&mut conn);
    let t = tag(&mut conn, "cascade");
    let rice = ingredient(&mut conn, "cascade-rice", "g");
    let created = recipe(&mut conn, &author, "Rice", &[t.id], &[line(&rice, 300)]);

    assert!(RecipeEdge::Favorite.add(&mut conn, fan.id, created.id).unwrap());
    assert!(RecipeEdge::ShoppingCart
        .add(&mut conn, fan.id, created.id)
        .unwrap());

    recipes::delete_recipe(&mut conn, &created).unwrap();

    let count = |conn: &mut PgConnection| -> (i64, i64, i64, i64, i64) {
        (
            recipe_ingredients::table
                .filter(recipe_ingredients::recipe_id.eq(created.id))
                .count()
                .get_result(conn)
                .unwrap(),
            recipe_tags::table
                .filter(recipe_tags::recipe_id.eq(created.id))
                .count()
                .get_result(conn)
                .unwrap(),
            favorites::table
                .filter(favorites::recipe_id.eq(created.id))
                .count()
                .get_result(conn)
                .unwrap(),
            shopping_cart_items::table
                .filter(shopping_cart_items::recipe_id.eq(created.id))
                .count()
                .get_result(conn)
                .unwrap(),
            images_table::table
                .filter(images_table::id.eq(created.image_id))
                .count()
                .get_result(conn)
                .unwrap(),
        )
    };
    assert_eq!(count(&mut conn), (0, 0, 0, 0, 0));
    assert!(matches!(
        recipes::find_recipe(&mut conn, created.id),
        Err(diesel::result::Error::NotFound)
    ));
}

#[test]
fn test_list_filters() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let alice = user(&mut conn);
    let bob = user(&mut conn);
    let breakfast = tag(&mut conn, "filter-breakfast");
    let dinner = tag(&mut conn, "filter-dinner");
    let lunch = tag(&mut conn, "filter-lunch");
    let oats = ingredient(&mut conn, "filter-oats", "g");

    let porridge = recipe(&mut conn, &alice, "Porridge", &[breakfast.id], &[line(&oats, 80)]);
    let stew = recipe(&mut conn, &alice, "Stew", &[dinner.id], &[line(&oats, 10)]);
    let salad = recipe(&mut conn, &bob, "Salad", &[lunch.id], &[line(&oats, 5)]);

    // Creation times inside one transaction are equal; spread them out.
    for (offset, r) in [(3, &porridge), (2, &stew), (1, &salad)] {
        diesel::update(recipes_table::table.find(r.id))
            .set(recipes_table::created_at.eq(Utc::now() - Duration::minutes(offset)))
            .execute(&mut conn)
            .unwrap();
    }

    let ids = |conn: &mut PgConnection, filter: &RecipeFilter| -> (Vec<Uuid>, i64) {
        let (rows, total) = recipes::list_recipes(conn, filter, &first_page()).unwrap();
        (rows.into_iter().map(|r| r.id).collect(), total)
    };

    let by_tags = RecipeFilter {
        tag_ids: Some(vec![breakfast.id, dinner.id]),
        ..Default::default()
    };
    assert_eq!(ids(&mut conn, &by_tags), (vec![stew.id, porridge.id], 2));

    let by_author = RecipeFilter {
        author: Some(bob.id),
        ..Default::default()
    };
    assert_eq!(ids(&mut conn, &by_author), (vec![salad.id], 1));

    RecipeEdge::Favorite
        .add(&mut conn, bob.id, porridge.id)
        .unwrap();
    let favorited = RecipeFilter {
        favorited: EdgeScope::LinkedTo(bob.id),
        ..Default::default()
    };
    assert_eq!(ids(&mut conn, &favorited), (vec![porridge.id], 1));

    let anonymous = RecipeFilter {
        favorited: EdgeScope::Nothing,
        ..Default::default()
    };
    assert_eq!(ids(&mut conn, &anonymous), (vec![], 0));

    let unknown_tags = RecipeFilter {
        tag_ids: Some(vec![]),
        ..Default::default()
    };
    assert_eq!(ids(&mut conn, &unknown_tags), (vec![], 0));
}

#[test]
fn test_list_pagination_counts_all_matches() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let t = tag(&mut conn, "paging");
    let water = ingredient(&mut conn, "paging-water", "ml");
    for name in ["One", "Two", "Three"] {
        recipe(&mut conn, &author, name, &[t.id], &[line(&water, 1)]);
    }

    let filter = RecipeFilter {
        author: Some(author.id),
        ..Default::default()
    };
    let page = PageRequest::new(Some(2), Some(2), 6, 100).unwrap();
    let (rows, total) = recipes::list_recipes(&mut conn, &filter, &page).unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_shopping_cart_report() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let shopper = user(&mut conn);
    let t = tag(&mut conn, "cart");
    let flour = ingredient(&mut conn, "flour", "g");
    let egg = ingredient(&mut conn, "egg", "pcs");
    let milk = ingredient(&mut conn, "milk", "ml");

    let a = recipe(
        &mut conn,
        &author,
        "Recipe A",
        &[t.id],
        &[line(&flour, 200), line(&egg, 2)],
    );
    let b = recipe(
        &mut conn,
        &author,
        "Recipe B",
        &[t.id],
        &[line(&flour, 100), line(&milk, 50)],
    );

    // Empty cart: header only.
    let lines = recipes::cart_lines(&mut conn, shopper.id).unwrap();
    assert_eq!(render_report(&aggregate(lines)), "Shopping list:\n");

    RecipeEdge::ShoppingCart
        .add(&mut conn, shopper.id, b.id)
        .unwrap();
    RecipeEdge::ShoppingCart
        .add(&mut conn, shopper.id, a.id)
        .unwrap();

    let report = render_report(&aggregate(
        recipes::cart_lines(&mut conn, shopper.id).unwrap(),
    ));
    assert_eq!(
        report,
        "Shopping list:\negg\t2 (pcs)\nflour\t300 (g)\nmilk\t50 (ml)\n"
    );

    let again = render_report(&aggregate(
        recipes::cart_lines(&mut conn, shopper.id).unwrap(),
    ));
    assert_eq!(report, again);
}

#[test]
fn test_ingredient_search_ranks_prefix_first() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let unit = format!("unit-{}", Uuid::new_v4().simple());
    for name in ["almond milk", "millet", "milk", "semolina"] {
        ingredient(&mut conn, name, &unit);
    }

    let found: Vec<String> = catalog::search_ingredients(&mut conn, Some("MIL"))
        .unwrap()
        .into_iter()
        .filter(|i| i.measurement_unit == unit)
        .map(|i| i.name)
        .collect();
    assert_eq!(found, vec!["milk", "millet", "almond milk"]);
}

#[test]
fn test_short_link_lookup() {
    let Some(mut conn) = test_connection() else {
        return;
    };
    let author = user(&mut conn);
    let t = tag(&mut conn, "link");
    let tea = ingredient(&mut conn, "link-tea", "g");
    let created = recipe(&mut conn, &author, "Tea", &[t.id], &[line(&tea, 3)]);

    assert_eq!(
        recipes::find_by_short_link(&mut conn, &created.short_link).unwrap(),
        Some(created.id)
    );
    assert_eq!(
        recipes::find_by_short_link(&mut conn, "missing0").unwrap(),
        None
    );
}
