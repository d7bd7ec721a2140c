use crate::models::{Image, NewImage};
use crate::schema::images;
use diesel::prelude::*;
use larder_core::DecodedImage;
use uuid::Uuid;

pub fn insert_image(conn: &mut PgConnection, image: &DecodedImage) -> QueryResult<Uuid> {
    diesel::insert_into(images::table)
        .values(&NewImage {
            content_type: &image.content_type,
            data: &image.data,
        })
        .returning(images::id)
        .get_result(conn)
}

pub fn get_image(conn: &mut PgConnection, id: Uuid) -> QueryResult<Image> {
    images::table
        .find(id)
        .select(Image::as_select())
        .first(conn)
}

pub fn delete_image(conn: &mut PgConnection, id: Uuid) -> QueryResult<usize> {
    diesel::delete(images::table.find(id)).execute(conn)
}
