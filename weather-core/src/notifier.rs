use chrono::Utc;
use std::{collections::HashMap, rc::Rc};

use crate::{
    category::Category,
    error::NotifierError,
    model::DispatchReport,
    status::{SilentReporter, Status, StatusReporter},
    subscriber::Subscriber,
};

/// Registry of subscribers keyed by the weather category they care about.
///
/// Each notifier owns its own subscriptions; two notifiers in the same process
/// never see each other's subscribers. Subscribers are held through shared
/// handles, and removal matches on handle identity rather than on name.
pub struct WeatherNotifier {
    subscribers: HashMap<Category, Vec<Rc<dyn Subscriber>>>,
    reporter: Box<dyn StatusReporter>,
}

impl Default for WeatherNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherNotifier {
    pub fn new() -> Self {
        Self::with_reporter(Box::new(SilentReporter))
    }

    pub fn with_reporter(reporter: Box<dyn StatusReporter>) -> Self {
        Self { subscribers: HashMap::new(), reporter }
    }

    /// Append `subscriber` to the list for `category`. Duplicates are kept.
    pub fn subscribe(&mut self, subscriber: Rc<dyn Subscriber>, category: Category) {
        let name = subscriber.name().to_string();
        self.subscribers.entry(category).or_default().push(subscriber);
        self.emit(Status::Subscribed { subscriber: name, category });
    }

    /// Subscribe using untyped input. Unknown categories are ignored without a record.
    pub fn subscribe_raw(&mut self, subscriber: Rc<dyn Subscriber>, raw: &str) -> Option<Category> {
        let category = Category::try_from(raw).ok()?;
        self.subscribe(subscriber, category);
        Some(category)
    }

    /// Remove the first registration of this exact handle for `category`.
    pub fn unsubscribe(
        &mut self,
        subscriber: &Rc<dyn Subscriber>,
        category: Category,
    ) -> Result<(), NotifierError> {
        let not_subscribed =
            || NotifierError::NotSubscribed { subscriber: subscriber.name().to_string(), category };

        let list = self.subscribers.get_mut(&category).ok_or_else(not_subscribed)?;
        let idx = list.iter().position(|s| Rc::ptr_eq(s, subscriber)).ok_or_else(not_subscribed)?;
        list.remove(idx);

        self.emit(Status::Unsubscribed { subscriber: subscriber.name().to_string(), category });
        Ok(())
    }

    /// Call `update` on every subscriber of `category`, in subscription order.
    pub fn dispatch(&self, category: Category) -> DispatchReport {
        self.emit(Status::Notifying { category });

        let subscribers = self.subscribers(category);
        for subscriber in subscribers {
            subscriber.update(category);
        }

        DispatchReport { category, notified: subscribers.len(), dispatched_at: Utc::now() }
    }

    /// Normalize an externally supplied condition and dispatch it if it is known.
    ///
    /// Unknown conditions are not an error: they produce an informational
    /// `NoSubscribers` record and `None`.
    pub fn check_weather(&self, raw: &str) -> Option<DispatchReport> {
        let condition = Category::normalize(raw);
        match Category::try_from(condition.as_str()) {
            Ok(category) => Some(self.dispatch(category)),
            Err(_) => {
                self.emit(Status::NoSubscribers { condition });
                None
            }
        }
    }

    pub fn subscribers(&self, category: Category) -> &[Rc<dyn Subscriber>] {
        self.subscribers.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn subscriber_count(&self, category: Category) -> usize {
        self.subscribers(category).len()
    }

    pub fn is_subscribed(&self, subscriber: &Rc<dyn Subscriber>, category: Category) -> bool {
        self.subscribers(category).iter().any(|s| Rc::ptr_eq(s, subscriber))
    }

    fn emit(&self, status: Status) {
        tracing::debug!("{}", status.to_string().trim_start());
        self.reporter.report(&status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::RecordingSubscriber;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct RecordingReporter {
        statuses: RefCell<Vec<Status>>,
    }

    impl StatusReporter for RecordingReporter {
        fn report(&self, status: &Status) {
            self.statuses.borrow_mut().push(status.clone());
        }
    }

    /// Subscriber that appends its name to a shared journal, to observe call order.
    #[derive(Debug)]
    struct JournalSubscriber {
        name: String,
        journal: Rc<RefCell<Vec<(String, Category)>>>,
    }

    impl Subscriber for JournalSubscriber {
        fn name(&self) -> &str {
            &self.name
        }

        fn update(&self, category: Category) {
            self.journal.borrow_mut().push((self.name.clone(), category));
        }
    }

    fn recording(name: &str) -> (Rc<RecordingSubscriber>, Rc<dyn Subscriber>) {
        let rec = Rc::new(RecordingSubscriber::new(name));
        let handle: Rc<dyn Subscriber> = rec.clone();
        (rec, handle)
    }

    #[test]
    fn dispatch_notifies_subscriber_once_with_category() {
        for category in Category::all() {
            let mut notifier = WeatherNotifier::new();
            let (rec, handle) = recording("A");

            notifier.subscribe(handle, *category);
            let report = notifier.dispatch(*category);

            assert_eq!(rec.received(), vec![*category]);
            assert_eq!(report.category, *category);
            assert_eq!(report.notified, 1);
        }
    }

    #[test]
    fn unsubscribed_subscriber_is_not_notified() {
        let mut notifier = WeatherNotifier::new();
        let (rec, handle) = recording("A");

        notifier.subscribe(handle.clone(), Category::Cold);
        notifier.unsubscribe(&handle, Category::Cold).expect("was subscribed");
        let report = notifier.dispatch(Category::Cold);

        assert!(rec.received().is_empty());
        assert_eq!(report.notified, 0);
        assert!(!notifier.is_subscribed(&handle, Category::Cold));
    }

    #[test]
    fn dispatch_follows_subscription_order() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let a: Rc<dyn Subscriber> =
            Rc::new(JournalSubscriber { name: "A".into(), journal: journal.clone() });
        let b: Rc<dyn Subscriber> =
            Rc::new(JournalSubscriber { name: "B".into(), journal: journal.clone() });

        let mut notifier = WeatherNotifier::new();
        notifier.subscribe(a, Category::Rainy);
        notifier.subscribe(b, Category::Rainy);
        notifier.dispatch(Category::Rainy);

        assert_eq!(
            *journal.borrow(),
            vec![("A".to_string(), Category::Rainy), ("B".to_string(), Category::Rainy)]
        );
    }

    #[test]
    fn dispatch_only_reaches_matching_category() {
        let mut notifier = WeatherNotifier::new();
        let (cold, cold_handle) = recording("cold-fan");
        let (windy, windy_handle) = recording("windy-fan");

        notifier.subscribe(cold_handle, Category::Cold);
        notifier.subscribe(windy_handle, Category::Windy);
        notifier.dispatch(Category::Windy);

        assert!(cold.received().is_empty());
        assert_eq!(windy.received(), vec![Category::Windy]);
    }

    #[test]
    fn subscribe_raw_ignores_unknown_category_silently() {
        let reporter = Rc::new(RecordingReporter::default());
        let mut notifier = WeatherNotifier::with_reporter(Box::new(reporter.clone()));
        let (_, handle) = recording("A");

        assert_eq!(notifier.subscribe_raw(handle.clone(), "foggy"), None);

        for category in Category::all() {
            assert_eq!(notifier.subscriber_count(*category), 0);
        }
        assert!(reporter.statuses.borrow().is_empty());
    }

    #[test]
    fn subscribe_raw_normalizes_known_category() {
        let mut notifier = WeatherNotifier::new();
        let (_, handle) = recording("A");

        assert_eq!(notifier.subscribe_raw(handle.clone(), " Sunny "), Some(Category::Sunny));
        assert!(notifier.is_subscribed(&handle, Category::Sunny));
    }

    #[test]
    fn check_weather_with_unknown_condition_notifies_nobody() {
        let reporter = Rc::new(RecordingReporter::default());
        let mut notifier = WeatherNotifier::with_reporter(Box::new(reporter.clone()));
        let (rec, handle) = recording("A");
        notifier.subscribe(handle, Category::Rainy);

        assert_eq!(notifier.check_weather("  Foggy "), None);

        assert!(rec.received().is_empty());
        assert_eq!(
            reporter.statuses.borrow().last(),
            Some(&Status::NoSubscribers { condition: "foggy".to_string() })
        );
    }

    #[test]
    fn check_weather_normalizes_before_dispatch() {
        let mut notifier = WeatherNotifier::new();
        let (rec, handle) = recording("A");
        notifier.subscribe(handle, Category::Windy);

        let report = notifier.check_weather("\tWINDY  ").expect("windy is a known category");

        assert_eq!(report.category, Category::Windy);
        assert_eq!(rec.received(), vec![Category::Windy]);
    }

    #[test]
    fn unsubscribe_of_unknown_pair_is_reported_and_state_unchanged() {
        let mut notifier = WeatherNotifier::new();
        let (_, a) = recording("A");
        let (_, b) = recording("B");
        notifier.subscribe(a.clone(), Category::Warm);

        let err = notifier.unsubscribe(&b, Category::Warm).unwrap_err();
        assert_eq!(
            err,
            NotifierError::NotSubscribed { subscriber: "B".to_string(), category: Category::Warm }
        );

        let err = notifier.unsubscribe(&a, Category::Cold).unwrap_err();
        assert!(matches!(err, NotifierError::NotSubscribed { category: Category::Cold, .. }));

        assert_eq!(notifier.subscriber_count(Category::Warm), 1);
        assert!(notifier.is_subscribed(&a, Category::Warm));
    }

    #[test]
    fn unsubscribe_matches_handle_not_name() {
        let mut notifier = WeatherNotifier::new();
        let (_, first) = recording("twin");
        let (_, second) = recording("twin");
        notifier.subscribe(first.clone(), Category::Sunny);

        assert!(notifier.unsubscribe(&second, Category::Sunny).is_err());
        assert!(notifier.is_subscribed(&first, Category::Sunny));
    }

    #[test]
    fn duplicate_subscription_notifies_twice_and_unsubscribe_removes_one() {
        let mut notifier = WeatherNotifier::new();
        let (rec, handle) = recording("A");

        notifier.subscribe(handle.clone(), Category::Cold);
        notifier.subscribe(handle.clone(), Category::Cold);
        notifier.dispatch(Category::Cold);
        assert_eq!(rec.times_notified(Category::Cold), 2);

        notifier.unsubscribe(&handle, Category::Cold).expect("subscribed twice");
        notifier.dispatch(Category::Cold);
        assert_eq!(rec.times_notified(Category::Cold), 3);
        assert_eq!(notifier.subscriber_count(Category::Cold), 1);
    }

    #[test]
    fn one_subscriber_can_follow_several_categories() {
        let mut notifier = WeatherNotifier::new();
        let (rec, handle) = recording("A");

        notifier.subscribe(handle.clone(), Category::Cold);
        notifier.subscribe(handle, Category::Rainy);
        notifier.dispatch(Category::Rainy);
        notifier.dispatch(Category::Cold);

        assert_eq!(rec.received(), vec![Category::Rainy, Category::Cold]);
    }

    #[test]
    fn notifiers_do_not_share_subscriptions() {
        let mut first = WeatherNotifier::new();
        let second = WeatherNotifier::new();
        let (rec, handle) = recording("A");

        first.subscribe(handle, Category::Windy);
        let report = second.dispatch(Category::Windy);

        assert_eq!(report.notified, 0);
        assert!(rec.received().is_empty());
        assert_eq!(first.subscriber_count(Category::Windy), 1);
    }

    #[test]
    fn status_records_follow_operations() {
        let reporter = Rc::new(RecordingReporter::default());
        let mut notifier = WeatherNotifier::with_reporter(Box::new(reporter.clone()));
        let (_, handle) = recording("Chala");

        notifier.subscribe(handle.clone(), Category::Rainy);
        notifier.check_weather("rainy");
        notifier.unsubscribe(&handle, Category::Rainy).expect("subscribed");

        assert_eq!(
            *reporter.statuses.borrow(),
            vec![
                Status::Subscribed { subscriber: "Chala".into(), category: Category::Rainy },
                Status::Notifying { category: Category::Rainy },
                Status::Unsubscribed { subscriber: "Chala".into(), category: Category::Rainy },
            ]
        );
    }

    #[test]
    fn failed_unsubscribe_emits_no_record() {
        let reporter = Rc::new(RecordingReporter::default());
        let mut notifier = WeatherNotifier::with_reporter(Box::new(reporter.clone()));
        let (_, handle) = recording("A");

        assert!(notifier.unsubscribe(&handle, Category::Cold).is_err());
        assert!(reporter.statuses.borrow().is_empty());
    }

    #[test]
    fn failed_unsubscribe_leaves_map_untouched() {
        let mut notifier = WeatherNotifier::new();
        let (_, handle) = recording("A");
        notifier.subscribe(handle.clone(), Category::Warm);

        assert!(notifier.unsubscribe(&handle, Category::Cold).is_err());

        assert!(!notifier.subscribers.contains_key(&Category::Cold));
        assert_eq!(notifier.subscribers.len(), 1);
    }

    #[test]
    fn rainy_scenario() {
        let mut notifier = WeatherNotifier::new();
        let (a, a_handle) = recording("A");
        let (b, b_handle) = recording("B");

        notifier.subscribe(a_handle, Category::Rainy);
        notifier.check_weather("rainy");
        assert_eq!(a.times_notified(Category::Rainy), 1);

        notifier.subscribe(b_handle, Category::Rainy);
        let report = notifier.check_weather("rainy").expect("rainy is known");
        assert_eq!(report.notified, 2);
        assert_eq!(a.times_notified(Category::Rainy), 2);
        assert_eq!(b.times_notified(Category::Rainy), 1);

        assert!(notifier.check_weather("foggy").is_none());
        assert_eq!(a.received().len(), 2);
        assert_eq!(b.received().len(), 1);
    }

    #[test]
    fn report_serializes_category_as_lowercase() {
        let notifier = WeatherNotifier::new();
        let report = notifier.dispatch(Category::Sunny);

        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["category"], "sunny");
        assert_eq!(json["notified"], 0);
    }
}
