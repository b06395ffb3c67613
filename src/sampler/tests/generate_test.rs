#[cfg(test)]
mod generate_test {
    use crate::error::SampleError;
    use crate::sampler::generate::{generate, SampleRequest};
    use crate::sampler::random_source::impl_fake::RandomSourceSequence;
    use crate::sampler::random_source::impl_rand::RandomSourceRand;

    fn request(min: i64, max: i64, count: usize) -> SampleRequest {
        SampleRequest { min, max, count }
    }

    #[test]
    fn test_duplicates_are_skipped_and_result_is_sorted() {
        let mut random = RandomSourceSequence::new(vec![10, 10, 23, 1, 45, 44, 1, 7]);

        let numbers = generate(request(1, 45, 6), &mut random).unwrap();

        assert_eq!(numbers, vec![1, 7, 10, 23, 44, 45]);
        assert_eq!(random.draws(), 8);
    }

    #[test]
    fn test_count_larger_than_range_is_rejected() {
        let mut random = RandomSourceSequence::new(vec![1, 2, 3, 4, 5]);

        let result = generate(request(1, 5, 6), &mut random);

        assert_eq!(
            result,
            Err(SampleError::InvalidRange {
                min: 1,
                max: 5,
                count: 6
            })
        );
        assert_eq!(random.draws(), 0);
    }

    #[test]
    fn test_inverted_range_is_rejected_unless_empty() {
        let mut random = RandomSourceSequence::new(vec![]);

        assert!(generate(request(10, 1, 1), &mut random).is_err());
        assert_eq!(generate(request(10, 1, 0), &mut random), Ok(vec![]));
    }

    #[test]
    fn test_exhausting_the_range_returns_every_value() {
        let mut random = RandomSourceRand::seeded(7);

        let numbers = generate(request(-3, 3, 7), &mut random).unwrap();

        assert_eq!(numbers, vec![-3, -2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_extreme_bounds_do_not_overflow() {
        let wide = request(i64::MIN, i64::MAX, 3);
        assert!(wide.is_feasible());

        let mut random = RandomSourceRand::seeded(1);
        let numbers = generate(wide, &mut random).unwrap();
        assert_eq!(numbers.len(), 3);
    }

    #[test]
    fn test_out_of_range_draws_are_ignored() {
        let mut random = RandomSourceSequence::new(vec![0, 99, 2, 1]);

        let numbers = generate(request(1, 3, 2), &mut random).unwrap();

        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_random_draws_are_unique_in_range_and_ascending() {
        let mut random = RandomSourceRand::seeded(42);

        for count in 0..=45 {
            let numbers = generate(request(1, 45, count), &mut random).unwrap();
            assert_eq!(numbers.len(), count);
            assert!(numbers.windows(2).all(|w| w[0] < w[1]));
            assert!(numbers.iter().all(|n| (1..=45).contains(n)));
        }
    }
}
