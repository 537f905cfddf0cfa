// examples/basic_pipeline.rs

//! Prices a basket in three steps; the discount step is skipped when no
//! coupon was given.

use std::sync::Arc;
use stepflow::{ContextData, Control, FlowError, Outcome, Pipeline, SkipCondition};
use tracing::info;

#[derive(Clone, Debug, Default)]
struct Basket {
  line_totals_cents: Vec<u64>,
  coupon_percent: Option<u64>,
  total_cents: u64,
  log: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), FlowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  let no_coupon: SkipCondition<Basket> = Arc::new(|ctx: &ContextData<Basket>| ctx.read().coupon_percent.is_none());
  let mut pipeline = Pipeline::<Basket, FlowError>::new(&[
    ("sum_lines", false, None),
    ("apply_discount", false, Some(no_coupon)),
    ("round_total", true, None),
  ]);

  pipeline.on("sum_lines", |ctx: ContextData<Basket>| async move {
    let mut basket = ctx.write();
    basket.total_cents = basket.line_totals_cents.iter().sum();
    let entry = format!("subtotal {}", basket.total_cents);
    basket.log.push(entry);
    Ok::<_, FlowError>(Control::Continue)
  });

  pipeline.on("apply_discount", |ctx: ContextData<Basket>| async move {
    let mut basket = ctx.write();
    let percent = basket.coupon_percent.unwrap_or(0);
    basket.total_cents -= basket.total_cents * percent / 100;
    let entry = format!("discounted to {}", basket.total_cents);
    basket.log.push(entry);
    Ok::<_, FlowError>(Control::Continue)
  });

  // `round_total` is optional and has no handler, so it is passed over.

  for coupon in [None, Some(10)] {
    let ctx = ContextData::new(Basket {
      line_totals_cents: vec![1999, 2500],
      coupon_percent: coupon,
      ..Default::default()
    });
    let outcome = pipeline.run(ctx.clone()).await?;
    assert_eq!(outcome, Outcome::Completed);

    let basket = ctx.snapshot();
    info!(?coupon, total_cents = basket.total_cents, log = ?basket.log, "basket priced");
  }

  Ok(())
}
