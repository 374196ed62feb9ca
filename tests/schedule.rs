mod common;

use cinema_booking::{error::ServiceError, models::NewShow};
use common::{cinema, new_show, setup, TestContext};

async fn shows_on_screen(ctx: &TestContext, screen_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shows WHERE screen_id = $1")
        .bind(screen_id)
        .fetch_one(&ctx.db.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn touching_and_overlapping_windows_conflict() {
    let Some(ctx) = setup().await else { return };
    let cinema = cinema(&ctx, 20).await;

    ctx.bookings
        .add_show(&new_show(&cinema, (18, 0), (20, 0)))
        .await
        .expect("first show");

    // Окна замкнутые: общий край - тоже пересечение
    let touching = ctx.bookings.add_show(&new_show(&cinema, (20, 0), (21, 30))).await;
    assert!(matches!(touching, Err(ServiceError::ScheduleConflict)), "{:?}", touching);

    let overlapping = ctx.bookings.add_show(&new_show(&cinema, (17, 0), (18, 30))).await;
    assert!(matches!(overlapping, Err(ServiceError::ScheduleConflict)), "{:?}", overlapping);

    let inside = ctx.bookings.add_show(&new_show(&cinema, (18, 30), (19, 0))).await;
    assert!(matches!(inside, Err(ServiceError::ScheduleConflict)), "{:?}", inside);

    ctx.bookings
        .add_show(&new_show(&cinema, (20, 1), (22, 0)))
        .await
        .expect("show after a gap");

    assert_eq!(shows_on_screen(&ctx, cinema.screen_id).await, 2);
}

#[tokio::test]
async fn same_window_on_another_day_is_allowed() {
    let Some(ctx) = setup().await else { return };
    let cinema = cinema(&ctx, 20).await;

    let show = new_show(&cinema, (18, 0), (20, 0));
    ctx.bookings.add_show(&show).await.unwrap();

    let next_day = NewShow {
        date: show.date.succ_opt().unwrap(),
        ..show
    };
    ctx.bookings.add_show(&next_day).await.expect("next day");
}

#[tokio::test]
async fn rejected_show_leaves_no_seats() {
    let Some(ctx) = setup().await else { return };
    let cinema = cinema(&ctx, 15).await;

    ctx.bookings
        .add_show(&new_show(&cinema, (10, 0), (12, 0)))
        .await
        .unwrap();
    let result = ctx.bookings.add_show(&new_show(&cinema, (11, 0), (13, 0))).await;
    assert!(matches!(result, Err(ServiceError::ScheduleConflict)));

    let seats: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM seats s JOIN shows sh ON sh.show_id = s.show_id WHERE sh.screen_id = $1",
    )
    .bind(cinema.screen_id)
    .fetch_one(&ctx.db.pool)
    .await
    .unwrap();
    assert_eq!(seats, 15);
}

#[tokio::test]
async fn seats_follow_screen_capacity_and_price() {
    let Some(ctx) = setup().await else { return };
    let cinema = cinema(&ctx, 7).await;

    let show = NewShow {
        seat_price: Some(450),
        ..new_show(&cinema, (9, 0), (11, 15))
    };
    let show_id = ctx.bookings.add_show(&show).await.unwrap();

    let seats = ctx.bookings.list_seats(show_id).await.unwrap();
    assert_eq!(seats.len(), cinema.total_seats as usize);
    assert!(seats.iter().all(|s| s.is_available() && s.price == 450));
    assert_eq!(seats.first().map(|s| s.seat_number), Some(1));
    assert_eq!(seats.last().map(|s| s.seat_number), Some(7));
}

#[tokio::test]
async fn unknown_references_are_reported_in_order() {
    let Some(ctx) = setup().await else { return };
    let cinema = cinema(&ctx, 5).await;
    let base = new_show(&cinema, (14, 0), (16, 0));

    let no_multiplex = NewShow { multiplex_id: i64::MAX, ..base.clone() };
    assert!(matches!(
        ctx.bookings.add_show(&no_multiplex).await,
        Err(ServiceError::InvalidMultiplex)
    ));

    let no_screen = NewShow { screen_number: 99, ..base.clone() };
    assert!(matches!(
        ctx.bookings.add_show(&no_screen).await,
        Err(ServiceError::InvalidScreen)
    ));

    // Неизвестный экран важнее неизвестного фильма
    let no_screen_no_movie = NewShow {
        screen_number: 99,
        movie_title: "no such movie".to_string(),
        ..base.clone()
    };
    assert!(matches!(
        ctx.bookings.add_show(&no_screen_no_movie).await,
        Err(ServiceError::InvalidScreen)
    ));

    let no_movie = NewShow {
        movie_title: format!("{} (director's cut)", cinema.movie_title),
        ..base
    };
    assert!(matches!(
        ctx.bookings.add_show(&no_movie).await,
        Err(ServiceError::MovieNotFound)
    ));

    assert_eq!(shows_on_screen(&ctx, cinema.screen_id).await, 0);
}

#[tokio::test]
async fn listings_group_shows() {
    let Some(ctx) = setup().await else { return };
    let cinema = cinema(&ctx, 5).await;

    ctx.bookings.add_show(&new_show(&cinema, (12, 0), (14, 0))).await.unwrap();
    ctx.bookings.add_show(&new_show(&cinema, (15, 0), (17, 0))).await.unwrap();

    let by_multiplex = ctx
        .catalog
        .shows_by_multiplex_and_date(cinema.multiplex_id, common::show_date())
        .await
        .unwrap();
    assert_eq!(by_multiplex.len(), 1);
    assert_eq!(by_multiplex.get(&cinema.movie_title).map(Vec::len), Some(2));

    let by_movie = ctx
        .catalog
        .shows_by_movie_and_date(&cinema.movie_title, &cinema.city, common::show_date())
        .await
        .unwrap();
    assert_eq!(by_movie.values().map(Vec::len).sum::<usize>(), 2);
}
